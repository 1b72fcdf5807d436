use symdex::symbol::SymbolRecord;

/// Compact `(file, kind, name, start, end)` view of stored rows
pub fn summarize(records: &[SymbolRecord]) -> Vec<(String, String, String, usize, usize)> {
    records
        .iter()
        .map(|r| {
            (
                r.file_path.clone(),
                r.kind.clone(),
                r.name.clone(),
                r.start_line,
                r.end_line,
            )
        })
        .collect()
}

/// A C# file declaring `count` methods named `<prefix>0..<prefix>N` on one class
pub fn class_with_methods(class: &str, prefix: &str, count: usize) -> String {
    let mut source = format!("public class {}\n{{\n", class);
    for i in 0..count {
        source.push_str(&format!("    public void {}{}() {{ }}\n", prefix, i));
    }
    source.push_str("}\n");
    source
}
