/// Image decoding and artifact persistence for asciimorph.

pub mod export;
pub mod image;
