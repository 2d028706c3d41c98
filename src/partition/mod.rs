// src/partition/mod.rs

// Pipeline-Schritte in Abhängigkeitsreihenfolge
pub mod builder;
pub mod clip;
pub mod config;
pub mod decompose;
pub mod densify;
pub mod merger;
pub mod retry;
pub mod sampler;
pub mod validation;
pub mod voronoi_diagram; // RawCell und VoronoiExtractor auf Basis von spade

// Re-Exporte für den einfachen Zugriff
pub use self::builder::{PartitionOutput, VoronoiBuilder};
pub use self::clip::{Clipper, OutputCell};
pub use self::config::PartitionConfig;
pub use self::decompose::decompose;
pub use self::densify::{DensifiedSites, densify, initial_segment_length, mean_segment_length};
pub use self::merger::{MergedCell, Owner, PolygonMerger};
pub use self::retry::{BuildVerdict, NextStep, PartitionReport, RetryController, RetryState};
pub use self::sampler::{RngSource, SamplingRegion, SequenceSource, SiteSampler, SiteSource};
pub use self::validation::Validator;
pub use self::voronoi_diagram::{RawCell, VoronoiExtractor};
