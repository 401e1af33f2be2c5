mod find_context_tests;
mod window_tests;
