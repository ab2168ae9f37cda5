use std::fs;
use std::path::{Path, PathBuf};

const SAMPLE_RATE: u32 = 4000;
const SECONDS: f64 = 6.0;

const COLUMNS: [&str; 23] = [
    "Patient ID",
    "Recording locations:",
    "Age",
    "Sex",
    "Height",
    "Weight",
    "Pregnancy status",
    "Murmur",
    "Murmur locations",
    "Most audible location",
    "Systolic murmur timing",
    "Systolic murmur shape",
    "Systolic murmur grading",
    "Systolic murmur pitch",
    "Systolic murmur quality",
    "Diastolic murmur timing",
    "Diastolic murmur shape",
    "Diastolic murmur grading",
    "Diastolic murmur pitch",
    "Diastolic murmur quality",
    "Outcome",
    "Campaign",
    "Additional ID",
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
}

/// A windowed low-frequency burst, the shape of S1/S2.
fn burst(t: f64, centre: f64, width: f64, freq: f64, amplitude: f64) -> f64 {
    let envelope = (-(t - centre).powi(2) / (2.0 * width.powi(2))).exp();
    amplitude * envelope * (2.0 * std::f64::consts::PI * freq * (t - centre)).sin()
}

struct Patient {
    id: u32,
    valves: &'static [(&'static str, &'static str)],
    bpm: f64,
    murmur: bool,
    row: [&'static str; 21],
}

/// Heart-cycle segments `(start, end, state)` with state 1..=4 = S1, systole, S2, diastole.
fn segments(bpm: f64) -> Vec<(f64, f64, u8)> {
    let cycle = 60.0 / bpm;
    let mut out = vec![(0.0, 0.2, 0)];
    let mut t = 0.2;
    while t + cycle < SECONDS - 0.2 {
        let s1 = t + 0.12;
        let sys = s1 + 0.3 * cycle;
        let s2 = sys + 0.1;
        let end = t + cycle;
        out.extend([(t, s1, 1), (s1, sys, 2), (sys, s2, 3), (s2, end, 4)]);
        t = end;
    }
    out.push((t, SECONDS, 0));
    out
}

fn synthesize(segs: &[(f64, f64, u8)], murmur: bool, rng: &mut SimpleRng) -> Vec<i16> {
    let n = (SECONDS * f64::from(SAMPLE_RATE)) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / f64::from(SAMPLE_RATE);
            let mut y = rng.gauss(0.0, 60.0);
            for &(start, end, state) in segs {
                let centre = (start + end) / 2.0;
                match state {
                    1 => y += burst(t, centre, 0.02, 45.0, 9000.0),
                    3 => y += burst(t, centre, 0.015, 60.0, 6000.0),
                    2 if murmur && t >= start && t < end => y += rng.gauss(0.0, 900.0),
                    _ => {}
                }
            }
            y.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
        })
        .collect()
}

fn write_wav(path: &Path, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV file");
    for &s in samples {
        writer.write_sample(s).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV file");
}

fn main() {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    let data_dir = out_dir.join("training_data");
    fs::create_dir_all(&data_dir).expect("Failed to create output directory");

    let patients = [
        Patient {
            id: 2530,
            valves: &[("AV", "AV"), ("PV", "PV"), ("TV", "TV"), ("MV", "MV")],
            bpm: 72.0,
            murmur: false,
            row: [
                "AV+PV+TV+MV", "Child", "Female", "98.0", "15.9", "False", "Absent", "nan", "nan",
                "nan", "nan", "nan", "nan", "nan", "nan", "nan", "nan", "nan", "nan", "Normal",
                "CC2015",
            ],
        },
        Patient {
            id: 9979,
            valves: &[("AV", "AV"), ("MV", "MV_1"), ("MV", "MV_2")],
            bpm: 96.0,
            murmur: true,
            row: [
                "AV+MV+MV", "Infant", "Male", "65.0", "7.1", "False", "Present", "MV", "MV",
                "Holosystolic", "Plateau", "II/VI", "Medium", "Blowing", "nan", "nan", "nan",
                "nan", "nan", "Abnormal", "CC2014",
            ],
        },
        Patient {
            id: 13918,
            valves: &[("AV", "AV"), ("PV", "PV")],
            bpm: 84.0,
            murmur: false,
            row: [
                "AV+PV", "nan", "Female", "nan", "nan", "True", "Unknown", "nan", "nan", "nan",
                "nan", "nan", "nan", "nan", "nan", "nan", "nan", "nan", "nan", "Normal", "CC2014",
            ],
        },
    ];

    let mut rng = SimpleRng::new(42);
    let mut table =
        csv::Writer::from_path(out_dir.join("training_data.csv")).expect("Failed to create CSV");
    table.write_record(COLUMNS).expect("Failed to write CSV header");

    let mut files = 0;
    for patient in &patients {
        let segs = segments(patient.bpm);
        let mut annotation = format!(
            "{} {} {SAMPLE_RATE}\n",
            patient.id,
            patient.valves.len()
        );

        for &(valve, suffix) in patient.valves {
            let record = format!("{}_{suffix}", patient.id);
            let samples = synthesize(&segs, patient.murmur, &mut rng);

            write_wav(&data_dir.join(format!("{record}.wav")), &samples);
            fs::write(
                data_dir.join(format!("{record}.hea")),
                format!(
                    "{record} 1 {SAMPLE_RATE} {}\n{record}.wav 16+44 1 16 0 0 0 0 {valve}\n",
                    samples.len()
                ),
            )
            .expect("Failed to write header");
            let tsv: String = segs
                .iter()
                .map(|(start, end, state)| format!("{start:.3}\t{end:.3}\t{state}\n"))
                .collect();
            fs::write(data_dir.join(format!("{record}.tsv")), tsv)
                .expect("Failed to write segmentation");

            annotation.push_str(&format!("{record}.hea {record}.wav {record}.tsv\n"));
            files += 3;
        }

        annotation.push_str(&format!("#Murmur: {}\n#Outcome: {}\n", patient.row[6], patient.row[19]));
        fs::write(data_dir.join(format!("{}.txt", patient.id)), annotation)
            .expect("Failed to write annotation");
        files += 1;

        let id = patient.id.to_string();
        let mut record = vec![id.as_str()];
        record.extend(patient.row);
        record.push("nan");
        table.write_record(&record).expect("Failed to write CSV row");
    }
    table.flush().expect("Failed to flush CSV");

    println!(
        "Wrote {} patients ({files} files, {SAMPLE_RATE} Hz, {SECONDS} s each) to {}",
        patients.len(),
        out_dir.display()
    );
}
