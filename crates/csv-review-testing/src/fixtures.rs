//! Sample CSV documents used across integration tests.

/// Two data rows under a single header row (rows 2 and 3).
pub const SIMPLE: &str = "a,b\n1,2\n3,4\n";

/// Header spread over two rows, three data rows (rows 3 to 5).
pub const TWO_ROW_HEADER: &str = "\
Name,Score,Score
,math,art
ann,90,75
bob,60,88
cat,71,93
";

/// A quoted multi-line value and a row with a missing trailing cell.
pub const MULTILINE: &str = "\
id,summary,status
1,\"first line
second line\",open
2,short
";

/// Only a header row.
pub const HEADER_ONLY: &str = "a,b\n";

/// Build a CSV document with `rows` numbered data rows under header `n,label`.
pub fn numbered(rows: usize) -> String {
    let mut csv = String::from("n,label\n");
    for i in 1..=rows {
        csv.push_str(&format!("{},item {}\n", i, i));
    }
    csv
}
