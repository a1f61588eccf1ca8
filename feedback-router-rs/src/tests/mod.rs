mod support;

mod generation_tests;
mod web_tests;
