//! A couple of `expect_test` snapshots for the renderer-facing surfaces
//! (hunk headers, unified-diff serialization) where eyeballing the exact
//! text is more useful than asserting on individual fields.

use expect_test::expect;

use diffcore::unified::serialize;
use diffcore::{diff, DiffOptions};

#[test]
fn hunk_header_snapshot() {
    let result = diff("a\nb\nc\nd\ne", "a\nx\nc\ny\ne", DiffOptions::default());
    let headers: Vec<&str> = result.hunks.iter().map(|h| h.header.as_str()).collect();
    expect![[r#"["@@ -1,5 +1,5 @@"]"#]].assert_eq(&format!("{headers:?}"));
}

#[test]
fn unified_diff_serialize_snapshot() {
    let result = diff("a\nb\nc", "a\nx\nc", DiffOptions::default());
    let text = serialize("f", "f", &result.hunks);
    expect![[r#"
        --- f
        +++ f
        @@ -1,3 +1,3 @@
         a
        -b
        +x
         c
    "#]]
    .assert_eq(&text);
}
