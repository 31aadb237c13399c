mod vertical_scroll;

pub use vertical_scroll::VerticalScroll;
