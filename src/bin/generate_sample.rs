use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic Gapminder-shaped table (1952..=2007, every 5 years).
#[derive(Debug, Parser)]
struct Args {
    /// Output file; `.parquet` or `.csv`.
    #[arg(default_value = "gapminder.parquet")]
    output: PathBuf,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// (country, continent, iso_alpha, iso_num, pop 1952, gdpPercap 1952, lifeExp 1952)
const COUNTRIES: &[(&str, &str, &str, i64, f64, f64, f64)] = &[
    ("Algeria", "Africa", "DZA", 12, 9.28e6, 2449.0, 43.1),
    ("Egypt", "Africa", "EGY", 818, 22.2e6, 1418.8, 41.9),
    ("Ethiopia", "Africa", "ETH", 231, 20.9e6, 362.1, 34.1),
    ("Kenya", "Africa", "KEN", 404, 6.46e6, 853.5, 42.3),
    ("Nigeria", "Africa", "NGA", 566, 33.1e6, 1077.3, 36.3),
    ("South Africa", "Africa", "ZAF", 710, 14.3e6, 4725.3, 45.0),
    ("Argentina", "Americas", "ARG", 32, 17.9e6, 5911.3, 62.5),
    ("Brazil", "Americas", "BRA", 76, 56.6e6, 2108.9, 50.9),
    ("Canada", "Americas", "CAN", 124, 14.8e6, 11367.2, 68.8),
    ("Mexico", "Americas", "MEX", 484, 30.1e6, 3478.1, 50.8),
    ("Peru", "Americas", "PER", 604, 8.03e6, 3758.5, 43.9),
    ("United States", "Americas", "USA", 840, 157.6e6, 13990.5, 68.4),
    ("China", "Asia", "CHN", 156, 556.3e6, 400.4, 44.0),
    ("India", "Asia", "IND", 356, 372.0e6, 546.6, 37.4),
    ("Indonesia", "Asia", "IDN", 360, 82.1e6, 749.7, 37.5),
    ("Japan", "Asia", "JPN", 392, 86.5e6, 3216.9, 63.0),
    ("Korea, Rep.", "Asia", "KOR", 410, 20.9e6, 1030.6, 47.5),
    ("Saudi Arabia", "Asia", "SAU", 682, 4.0e6, 6459.6, 39.9),
    ("France", "Europe", "FRA", 250, 42.5e6, 7029.8, 67.4),
    ("Germany", "Europe", "DEU", 276, 69.1e6, 7144.1, 67.5),
    ("Italy", "Europe", "ITA", 380, 47.7e6, 4931.4, 65.9),
    ("Norway", "Europe", "NOR", 578, 3.33e6, 10095.4, 72.7),
    ("Spain", "Europe", "ESP", 724, 28.5e6, 3834.0, 64.9),
    ("United Kingdom", "Europe", "GBR", 826, 50.4e6, 9979.5, 69.2),
    ("Australia", "Oceania", "AUS", 36, 8.69e6, 10039.6, 69.1),
    ("New Zealand", "Oceania", "NZL", 554, 1.99e6, 10556.6, 69.4),
];

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

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }
}

#[derive(Default)]
struct Columns {
    country: Vec<&'static str>,
    continent: Vec<&'static str>,
    year: Vec<i32>,
    life_exp: Vec<f64>,
    pop: Vec<i64>,
    gdp_percap: Vec<f64>,
    iso_alpha: Vec<&'static str>,
    iso_num: Vec<i64>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns::default();

    for &(country, continent, iso_alpha, iso_num, pop0, gdp0, life0) in COUNTRIES {
        let pop_growth = rng.uniform(0.005, 0.03);
        let gdp_growth = rng.uniform(0.0, 0.045);
        let (mut pop, mut gdp, mut life) = (pop0, gdp0, life0);

        for year in (1952..=2007).step_by(5) {
            cols.country.push(country);
            cols.continent.push(continent);
            cols.year.push(year);
            cols.life_exp.push((life * 1000.0).round() / 1000.0);
            cols.pop.push(pop.round() as i64);
            cols.gdp_percap.push(gdp);
            cols.iso_alpha.push(iso_alpha);
            cols.iso_num.push(iso_num);

            // Life expectancy gains shrink as it approaches ~85.
            life += (85.0 - life) * rng.uniform(0.04, 0.12);
            pop *= (1.0 + pop_growth).powi(5);
            gdp *= (1.0 + gdp_growth + rng.uniform(-0.02, 0.02)).powi(5);
        }
    }

    cols
}

fn write_parquet(path: &Path, cols: Columns) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("continent", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("lifeExp", DataType::Float64, false),
        Field::new("pop", DataType::Int64, false),
        Field::new("gdpPercap", DataType::Float64, false),
        Field::new("iso_alpha", DataType::Utf8, false),
        Field::new("iso_num", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(cols.country)),
            Arc::new(StringArray::from(cols.continent)),
            Arc::new(Int32Array::from(cols.year)),
            Arc::new(Float64Array::from(cols.life_exp)),
            Arc::new(Int64Array::from(cols.pop)),
            Arc::new(Float64Array::from(cols.gdp_percap)),
            Arc::new(StringArray::from(cols.iso_alpha)),
            Arc::new(Int64Array::from(cols.iso_num)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn write_csv(path: &Path, cols: Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating output file")?;
    writer.write_record([
        "country", "continent", "year", "lifeExp", "pop", "gdpPercap", "iso_alpha", "iso_num",
    ])?;
    for i in 0..cols.year.len() {
        writer.write_record([
            cols.country[i].to_string(),
            cols.continent[i].to_string(),
            cols.year[i].to_string(),
            cols.life_exp[i].to_string(),
            cols.pop[i].to_string(),
            cols.gdp_percap[i].to_string(),
            cols.iso_alpha[i].to_string(),
            cols.iso_num[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let cols = generate(&mut rng);
    let rows = cols.year.len();

    match args.output.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("pq") => write_parquet(&args.output, cols)?,
        Some("csv") => write_csv(&args.output, cols)?,
        _ => bail!("output must end in .parquet or .csv"),
    }

    println!(
        "Wrote {rows} observations ({} countries) to {}",
        COUNTRIES.len(),
        args.output.display()
    );
    Ok(())
}
