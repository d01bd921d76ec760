mod layout_tests;
mod tiled_tests;
