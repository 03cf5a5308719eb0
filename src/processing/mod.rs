//! Resume processing: structure model, section parsing, keyword corpus,
//! coverage analysis and rendering

pub mod document;
pub mod parser;
pub mod profile;
pub mod corpus;
pub mod corpus_builder;
pub mod coverage;
pub mod renderer;

pub use corpus::{Keyword, KeywordCorpus};
pub use corpus_builder::{CorpusBuilder, KeywordCount, Priority, TOP_KEYWORDS};
pub use coverage::{CoverageAnalyzer, CoverageReport, SectionHits};
pub use document::{ResumeStructure, Section};
pub use parser::{ParsePolicy, SectionParser};
pub use profile::{AliasTable, RenderProfile, SectionOrder};
pub use renderer::StructureRenderer;
