pub mod id3_native;
pub mod id3v2;
pub mod tagger;
