//! Remote page fetcher
//!
//! Issues one GET per remote page of a collection endpoint and turns the
//! response into a `FetchedPage`.
//!
//! # Failure classification
//!
//! | Response                                  | page 1                 | later pages       |
//! |-------------------------------------------|------------------------|-------------------|
//! | 400, or 404                               | `ProtocolUnsupported`  | end of data       |
//! | body not a JSON array                     | `ProtocolUnsupported`  | end of data       |
//! | other 4xx/5xx                             | `HttpStatus`           | `HttpStatus`      |
//! | connection failure                        | `Connection`           | `Connection`      |

mod fetcher;

pub use fetcher::{FetchedPage, PageFetcher, PageQuery, TOTAL_HEADER, TOTAL_PAGES_HEADER};

#[cfg(test)]
mod tests;
