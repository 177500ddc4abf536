use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[(self.next_f64() * items.len() as f64) as usize % items.len()]
    }

    /// Pick `n` distinct items.
    fn sample<'a>(&mut self, items: &'a [&'a str], n: usize) -> Vec<&'a str> {
        let mut out: Vec<&str> = Vec::with_capacity(n);
        while out.len() < n.min(items.len()) {
            let item = self.pick(items);
            if !out.contains(&item) {
                out.push(item);
            }
        }
        out
    }
}

const GENRES: [&str; 12] = [
    "Drama", "Comedy", "Thriller", "Action", "Romance", "Adventure", "Crime",
    "Science Fiction", "Horror", "Family", "Fantasy", "Mystery",
];

const ACTORS: [&str; 16] = [
    "Robert De Niro", "Samuel L. Jackson", "Bruce Willis", "Nicolas Cage",
    "Michael Caine", "Matt Damon", "Johnny Depp", "Tom Hanks", "Meryl Streep",
    "Sylvester Stallone", "Clint Eastwood", "Gene Hackman", "Morgan Freeman",
    "Julianne Moore", "Harrison Ford", "Susan Sarandon",
];

const WORDS: [&str; 10] = [
    "Night", "Return", "Shadow", "River", "Empire", "Last", "Summer", "Code",
    "Silent", "Storm",
];

/// One row in the TMDb export layout.
#[derive(Debug, Clone, Serialize)]
struct SampleMovie {
    id: i64,
    imdb_id: String,
    popularity: f64,
    budget: i64,
    revenue: i64,
    original_title: String,
    cast: String,
    homepage: String,
    tagline: String,
    keywords: String,
    overview: String,
    runtime: i64,
    genres: String,
    release_date: String,
    vote_count: i64,
    vote_average: f64,
    release_year: i64,
    budget_adj: f64,
    revenue_adj: f64,
}

fn generate(rng: &mut SimpleRng, rows: usize) -> Vec<SampleMovie> {
    let mut movies = Vec::with_capacity(rows);
    for i in 0..rows {
        let year = rng.range(1960, 2015);
        let month = rng.range(1, 12);
        let day = rng.range(1, 28);
        // Later films are more popular and more expensive.
        let era = (year - 1960) as f64 / 55.0;
        let popularity = (rng.next_f64() * 3.0 * (0.3 + era)).max(0.001);

        // Roughly a third of the TMDb rows have no budget or revenue on record.
        let budget = if rng.next_f64() < 0.3 {
            0
        } else {
            rng.range(1, 200) * 1_000_000 / 2 * (1 + era as i64)
        };
        let revenue = if rng.next_f64() < 0.3 {
            0
        } else {
            (budget as f64 * (0.2 + rng.next_f64() * 4.0)) as i64 + rng.range(0, 5_000_000)
        };
        let runtime = if rng.next_f64() < 0.02 { 0 } else { rng.range(70, 190) };

        let n_genres = rng.range(1, 3) as usize;
        let genres = rng.sample(&GENRES, n_genres).join("|");
        let n_cast = rng.range(3, 5) as usize;
        let cast = rng.sample(&ACTORS, n_cast).join("|");
        let title = format!("{} {}", rng.pick(&WORDS), rng.pick(&WORDS));

        movies.push(SampleMovie {
            id: 100_000 + i as i64,
            imdb_id: format!("tt{:07}", 3_000_000 + i),
            popularity: (popularity * 1e6).round() / 1e6,
            budget,
            revenue,
            original_title: title.clone(),
            cast,
            homepage: format!("http://www.example.com/{}", i),
            tagline: format!("{title} returns."),
            keywords: "sample|synthetic".to_string(),
            overview: format!("A generated movie released in {year}."),
            runtime,
            genres,
            release_date: format!("{month}/{day}/{:02}", year % 100),
            vote_count: rng.range(10, 5000),
            vote_average: (rng.range(30, 85) as f64) / 10.0,
            release_year: year,
            budget_adj: budget as f64 * 1.1,
            revenue_adj: revenue as f64 * 1.1,
        });
    }

    // A handful of exact duplicates, as in the real export.
    let dupes: Vec<SampleMovie> = movies.iter().step_by(97).cloned().collect();
    movies.extend(dupes);
    movies
}

fn write_csv(path: &str, movies: &[SampleMovie]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for movie in movies {
        writer.serialize(movie).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, movies: &[SampleMovie]) -> Result<()> {
    fn strings(movies: &[SampleMovie], f: impl Fn(&SampleMovie) -> &str) -> ArrayRef {
        Arc::new(StringArray::from(movies.iter().map(f).collect::<Vec<_>>()))
    }
    fn ints(movies: &[SampleMovie], f: impl Fn(&SampleMovie) -> i64) -> ArrayRef {
        Arc::new(Int64Array::from(movies.iter().map(f).collect::<Vec<_>>()))
    }
    fn floats(movies: &[SampleMovie], f: impl Fn(&SampleMovie) -> f64) -> ArrayRef {
        Arc::new(Float64Array::from(movies.iter().map(f).collect::<Vec<_>>()))
    }

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("id", ints(movies, |m| m.id)),
        ("imdb_id", strings(movies, |m| &m.imdb_id)),
        ("popularity", floats(movies, |m| m.popularity)),
        ("budget", ints(movies, |m| m.budget)),
        ("revenue", ints(movies, |m| m.revenue)),
        ("original_title", strings(movies, |m| &m.original_title)),
        ("cast", strings(movies, |m| &m.cast)),
        ("homepage", strings(movies, |m| &m.homepage)),
        ("tagline", strings(movies, |m| &m.tagline)),
        ("keywords", strings(movies, |m| &m.keywords)),
        ("overview", strings(movies, |m| &m.overview)),
        ("runtime", ints(movies, |m| m.runtime)),
        ("genres", strings(movies, |m| &m.genres)),
        ("release_date", strings(movies, |m| &m.release_date)),
        ("vote_count", ints(movies, |m| m.vote_count)),
        ("vote_average", floats(movies, |m| m.vote_average)),
        ("release_year", ints(movies, |m| m.release_year)),
        ("budget_adj", floats(movies, |m| m.budget_adj)),
        ("revenue_adj", floats(movies, |m| m.revenue_adj)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, arr)| Field::new(*name, arr.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, arr)| arr).collect(),
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let rows: usize = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("row count must be a number, got '{arg}'"))?,
        None => 2000,
    };

    let mut rng = SimpleRng::new(42);
    let movies = generate(&mut rng, rows);

    write_csv("sample_movies.csv", &movies)?;
    write_parquet("sample_movies.parquet", &movies)?;

    log::info!("Generated {} rows ({rows} unique)", movies.len());
    println!(
        "Wrote {} movies to sample_movies.csv and sample_movies.parquet",
        movies.len()
    );
    Ok(())
}
