mod test_stroke_basic;
