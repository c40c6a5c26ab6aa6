// On-disk StarDict formats
//
// This module provides parsers for the descriptor, word index and synonym
// files, and offset-addressed reads from the definitions blob.

pub mod ifo;
pub mod idx;
pub mod syn;
pub mod dict_data;
pub mod reader_helper;

pub use ifo::{parse_descriptor, DescriptorInfo, IFO_MAGIC};
pub use idx::{parse_index, DataLocation, WordIndex};
pub use syn::{parse_synonyms, SynonymMap};
pub use dict_data::{open_definitions, read_definition, read_definition_with, DefinitionSource, DictFormat};
pub use reader_helper::RecordReader;
