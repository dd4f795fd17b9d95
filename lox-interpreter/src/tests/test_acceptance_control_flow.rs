//! if/else, loops, break and the for desugaring

use super::assert_prints;

#[test]
fn test_if_else() {
    assert_prints(r#"if (true) print "then"; else print "else";"#, &["then"]);
    assert_prints(r#"if (nil) print "then"; else print "else";"#, &["else"]);
    assert_prints(r#"if (false) print "skipped"; print "after";"#, &["after"]);
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    assert_prints(
        r#"if (true) if (false) print "inner"; else print "nearest";"#,
        &["nearest"],
    );
}

#[test]
fn test_while_loop() {
    assert_prints(
        "var i = 0; while (i < 3) { print i; i = i + 1; }",
        &["0", "1", "2"],
    );
}

#[test]
fn test_for_loop() {
    assert_prints("for (var i = 0; i < 3; i = i + 1) print i;", &["0", "1", "2"]);
}

#[test]
fn test_for_loop_variable_is_scoped_to_the_loop() {
    assert_prints(
        r#"var i = "outer";
           for (var i = 0; i < 2; i = i + 1) {}
           print i;"#,
        &["outer"],
    );
}

#[test]
fn test_for_loop_with_omitted_clauses() {
    assert_prints(
        "var i = 0;
         for (; i < 2;) { print i; i = i + 1; }",
        &["0", "1"],
    );
    assert_prints(
        "var n = 0;
         for (;;) { n = n + 1; if (n == 4) break; }
         print n;",
        &["4"],
    );
}

#[test]
fn test_break_leaves_innermost_loop() {
    assert_prints(
        "var i = 0;
         while (true) {
           if (i == 3) break;
           print i;
           i = i + 1;
         }",
        &["0", "1", "2"],
    );

    assert_prints(
        "for (var outer = 0; outer < 2; outer = outer + 1) {
           for (var inner = 0; inner < 10; inner = inner + 1) {
             if (inner == 1) break;
             print outer;
           }
         }",
        &["0", "1"],
    );
}

#[test]
fn test_break_skips_for_increment() {
    assert_prints(
        "var last;
         for (var i = 0; i < 10; i = i + 1) { last = i; if (i == 2) break; }
         print last;",
        &["2"],
    );
}

#[test]
fn test_return_from_inside_loop() {
    assert_prints(
        "fun firstOver(limit) {
           for (var i = 0; ; i = i + 1) {
             if (i * i > limit) return i;
           }
         }
         print firstOver(10);",
        &["4"],
    );
}

#[test]
fn test_block_statements_run_in_order() {
    assert_prints(r#"{ print "a"; { print "b"; } print "c"; }"#, &["a", "b", "c"]);
}
