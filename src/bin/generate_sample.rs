//! Writes `sample_devices.csv` and `sample_devices.xlsx`: a small table of
//! phones with some exact duplicate rows and some missing numeric cells, for
//! trying out the cleaning operations.

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

const BRANDS: [(&str, &[&str]); 4] = [
    ("Google", &["Pixel 7", "Pixel 8", "Pixel 8 Pro"]),
    ("Apple", &["iPhone 14", "iPhone 15", "iPhone 15 Pro"]),
    ("Samsung", &["Galaxy S23", "Galaxy S24", "Galaxy A54"]),
    ("Nokia", &["G42", "X30"]),
];

const HEADERS: [&str; 6] = ["brand", "model", "battery_mah", "price_usd", "rating", "has_5g"];

/// Seeded xoshiro256** (Blackman & Vigna), so the sample files are the same
/// on every run. Only the draws the generator needs are exposed.
struct SampleRng {
    state: [u64; 4],
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        let mut state = [0u64; 4];
        let mut x = seed;
        for slot in &mut state {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SampleRng { state }
    }

    fn next_u64(&mut self) -> u64 {
        let s = &mut self.state;
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 17;
        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(45);
        result
    }

    /// Uniform in `[lo, hi)`.
    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn chance(&mut self, p: f64) -> bool {
        self.between(0.0, 1.0) < p
    }
}

/// One generated row; `None` marks a missing cell.
#[derive(Clone)]
struct Device {
    brand: &'static str,
    model: &'static str,
    battery_mah: Option<i64>,
    price_usd: Option<f64>,
    rating: Option<f64>,
    has_5g: bool,
}

impl Device {
    fn csv_fields(&self) -> [String; 6] {
        [
            self.brand.to_string(),
            self.model.to_string(),
            self.battery_mah.map(|v| v.to_string()).unwrap_or_default(),
            self.price_usd.map(|v| format!("{v:.2}")).unwrap_or_default(),
            self.rating.map(|v| format!("{v:.1}")).unwrap_or_default(),
            if self.has_5g { "True" } else { "False" }.to_string(),
        ]
    }
}

fn generate(rng: &mut SampleRng, n_unique: usize) -> Vec<Device> {
    let mut rows: Vec<Device> = Vec::with_capacity(n_unique + n_unique / 5);
    for _ in 0..n_unique {
        let (brand, models) = BRANDS[rng.below(BRANDS.len())];
        let model = models[rng.below(models.len())];
        let device = Device {
            brand,
            model,
            battery_mah: (!rng.chance(0.1)).then(|| 3000 + 100 * rng.below(25) as i64),
            price_usd: (!rng.chance(0.15)).then(|| (rng.between(149.0, 1199.0) * 100.0).round() / 100.0),
            rating: (!rng.chance(0.1)).then(|| rng.between(30.0, 50.0).round() / 10.0),
            has_5g: rng.chance(0.7),
        };
        rows.push(device);

        // Sprinkle exact duplicates of earlier rows.
        if rng.chance(0.2) {
            let earlier = rows[rng.below(rows.len())].clone();
            rows.push(earlier);
        }
    }
    rows
}

fn write_csv(path: &str, rows: &[Device]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record(row.csv_fields())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &str, rows: &[Device]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.brand)?;
        sheet.write_string(r, 1, row.model)?;
        if let Some(v) = row.battery_mah {
            sheet.write_number(r, 2, v as f64)?;
        }
        if let Some(v) = row.price_usd {
            sheet.write_number(r, 3, v)?;
        }
        if let Some(v) = row.rating {
            sheet.write_number(r, 4, v)?;
        }
        sheet.write_boolean(r, 5, row.has_5g)?;
    }
    workbook.save(path).with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SampleRng::new(42);
    let rows = generate(&mut rng, 60);

    write_csv("sample_devices.csv", &rows)?;
    write_xlsx("sample_devices.xlsx", &rows)?;

    println!(
        "Wrote {} rows to sample_devices.csv and sample_devices.xlsx",
        rows.len()
    );
    Ok(())
}
