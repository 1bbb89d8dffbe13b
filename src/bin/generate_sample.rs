use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated student row.
struct Student {
    name: String,
    year: i64,
    city: String,
    level: String,
    class: String,
    /// Kept as text so some rows can carry unreadable values.
    income: Option<String>,
}

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<Student> {
    let cities = ["Medan", "Bandung", "Surabaya", "Solo", "Makassar"];
    // City → income scale (median-ish, Rupiah).
    let city_income = [3_000_000.0, 4_500_000.0, 5_500_000.0, 2_500_000.0, 3_500_000.0];
    let levels: [(&str, &[&str]); 3] = [
        ("SD", &["1", "2", "3", "4", "5", "6"]),
        ("SMP", &["7", "8", "9"]),
        ("SMA", &["10", "11", "12"]),
    ];
    let years = [2022, 2023, 2024];

    (0..n)
        .map(|i| {
            let c = (rng.next_u64() % cities.len() as u64) as usize;
            let (level, classes) = levels[(rng.next_u64() % levels.len() as u64) as usize];

            // Log-normal around the city's typical income, rounded to 50k.
            let raw = city_income[c] * rng.gauss(0.0, 0.6).exp();
            let income = match rng.next_u64() % 40 {
                0 => None,
                1 => Some("tidak diketahui".to_string()),
                _ => Some(format!("{:.0}", (raw / 50_000.0).round() * 50_000.0)),
            };

            Student {
                name: format!("Siswa {:04}", i + 1),
                year: years[(rng.next_u64() % years.len() as u64) as usize],
                city: cities[c].to_string(),
                level: level.to_string(),
                class: rng.pick(classes).to_string(),
                income,
            }
        })
        .collect()
}

fn write_parquet(students: &[Student], output_path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("NAMA", DataType::Utf8, false),
        Field::new("TAHUN", DataType::Int64, false),
        Field::new("KOTA", DataType::Utf8, false),
        Field::new("JENJANG", DataType::Utf8, false),
        Field::new("KELAS", DataType::Utf8, false),
        Field::new("PENGHASILAN", DataType::Utf8, true),
    ]));

    let strings = |f: fn(&Student) -> &str| {
        StringArray::from(students.iter().map(f).collect::<Vec<_>>())
    };
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(strings(|s| s.name.as_str())),
            Arc::new(Int64Array::from(
                students.iter().map(|s| s.year).collect::<Vec<_>>(),
            )),
            Arc::new(strings(|s| s.city.as_str())),
            Arc::new(strings(|s| s.level.as_str())),
            Arc::new(strings(|s| s.class.as_str())),
            Arc::new(StringArray::from(
                students
                    .iter()
                    .map(|s| s.income.as_deref())
                    .collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(output_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// The CSV uses untidy headers on purpose; the app normalizes them.
fn write_csv(students: &[Student], output_path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path).context("creating CSV output")?;
    writer.write_record(["Nama", " tahun", "Kota ", "jenjang", "Kelas", " Penghasilan "])?;
    for s in students {
        writer.write_record([
            s.name.as_str(),
            s.year.to_string().as_str(),
            s.city.as_str(),
            s.level.as_str(),
            s.class.as_str(),
            s.income.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let students = generate(&mut rng, 600);

    write_parquet(&students, "sample_students.parquet")?;
    write_csv(&students, "sample_students.csv")?;

    log::info!("generated {} students", students.len());
    println!(
        "Wrote {} students to sample_students.parquet and sample_students.csv",
        students.len()
    );
    Ok(())
}
