pub mod bitcoincore_ext;

pub use bitcoincore_ext::RpcApiExt;

/// Turn a title into something usable as a file name
pub fn safe_filename(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let name = name.trim().trim_start_matches('.');
    if name.is_empty() {
        "untitled".into()
    } else {
        name.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename() {
        assert_eq!(
            safe_filename("Alice's Adventures in Wonderland"),
            "Alice's Adventures in Wonderland"
        );
        assert_eq!(safe_filename("a/b: c?"), "a_b_ c_");
        assert_eq!(safe_filename("  ..hidden "), "hidden");
        assert_eq!(safe_filename(""), "untitled");
    }
}
