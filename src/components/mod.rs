//! UI components: the chapter graph and the pages built around it.

pub mod chapter_graph;
pub mod pages;
