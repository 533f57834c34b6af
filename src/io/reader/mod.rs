mod docreader;

pub use docreader::{DocReader, Reader};
