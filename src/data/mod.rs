/// Data layer: dataset index, metadata table and patient records.
///
/// Architecture:
/// ```text
///  <root>/training_data/*.{txt,wav,hea,tsv}     <root>/training_data.csv
///        │                                              │
///        ▼                                              ▼
///   ┌──────────┐                                  ┌──────────┐
///   │  index    │  classify names → FileIndex     │  table    │  rows → PatientMetadata
///   └──────────┘                                  └──────────┘
///        │                                              │
///        └───────────────────┬──────────────────────────┘
///                            ▼
///                     ┌────────────┐
///                     │  dataset    │  get_patient / iter
///                     └────────────┘
///                            │
///                            ▼
///   ┌──────────────────────────────────────────────┐
///   │ model::Patient  waveform · header · segmentation │
///   └──────────────────────────────────────────────┘
///                            │
///                            ▼
///                     ┌────────────┐
///                     │  trace      │  time axis + labels for plotting
///                     └────────────┘
/// ```

pub mod dataset;
pub mod error;
pub mod header;
pub mod index;
pub mod model;
pub mod segmentation;
pub mod table;
pub mod trace;
pub mod waveform;

#[cfg(test)]
pub(crate) mod testutil;
