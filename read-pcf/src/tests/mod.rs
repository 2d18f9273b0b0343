//! Tests that load complete fonts.

mod test_layouts;
