use super::model::Recording;

/// A labelled time-domain line, independent of any plotting backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub title: String,
    /// Legend name, the valve and recording index.
    pub name: String,
    pub valve: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// `[time in seconds, amplitude]` of the first channel.
    pub points: Vec<[f64; 2]>,
}

impl Trace {
    pub fn new(patient: &str, valve: &str, index: &str, recording: &Recording) -> Self {
        let period = 1.0 / f64::from(recording.sample_rate);
        let points = recording
            .channel(0)
            .enumerate()
            .map(|(i, y)| [i as f64 * period, y])
            .collect();

        Trace {
            title: format!("Patient {patient}: {valve} Valve (Recording {index})"),
            name: format!("{valve}/{index}"),
            valve: valve.to_string(),
            x_label: "Time (s)",
            y_label: "AU",
            points,
        }
    }
}
