mod chunk_tests;
mod extent_tests;
