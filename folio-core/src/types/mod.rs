//! Core types shared by the loader and the reading session

mod book;
mod document;
mod kind;

pub use book::{BookRef, BookSource};
pub use document::{Document, DocumentOrigin};
pub use kind::BookKind;
