//! Relative module specifiers between generated files.
//!
//! Output files mirror their schema's module path, so every file lives at
//! `<segments>/<Name>.<ext>` under one root. Specifiers are always `/`-separated
//! and extension-less, whatever the host platform.

/// Output path of a schema's file, relative to the output root.
pub fn file_path(module_path: &[String], name: &str, extension: &str) -> String {
    let mut path = module_path.join("/");
    if !path.is_empty() {
        path.push('/');
    }
    path.push_str(name);
    if !extension.is_empty() {
        path.push('.');
        path.push_str(extension);
    }
    path
}

/// Specifier that imports `to_name` (living in `to_dir`) from a file in `from_dir`.
///
/// Shares the common prefix of both directories, climbs one `..` for each
/// remaining segment of `from_dir`, then descends into the rest of `to_dir`.
pub fn relative_specifier(from_dir: &[String], to_dir: &[String], to_name: &str) -> String {
    let common = from_dir
        .iter()
        .zip(to_dir)
        .take_while(|(a, b)| a == b)
        .count();
    let ups = from_dir.len() - common;

    let mut parts: Vec<&str> = Vec::with_capacity(ups + to_dir.len() - common + 2);
    if ups == 0 {
        parts.push(".");
    } else {
        parts.extend(std::iter::repeat_n("..", ups));
    }
    parts.extend(to_dir[common..].iter().map(String::as_str));
    parts.push(to_name);
    parts.join("/")
}

/// Specifier from the index file to a schema's file.
pub fn index_specifier(index_file: &str, module_path: &[String], name: &str) -> String {
    let index_dir: Vec<String> = match index_file.rsplit_once('/') {
        Some((dir, _)) => dir
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(String::from)
            .collect(),
        None => Vec::new(),
    };
    relative_specifier(&index_dir, module_path, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(path: &str) -> Vec<String> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    #[test]
    fn same_directory() {
        assert_eq!(relative_specifier(&segs("blog"), &segs("blog"), "User"), "./User");
        assert_eq!(relative_specifier(&[], &[], "User"), "./User");
    }

    #[test]
    fn descend() {
        assert_eq!(
            relative_specifier(&[], &segs("blog/users"), "User"),
            "./blog/users/User"
        );
        assert_eq!(
            relative_specifier(&segs("blog"), &segs("blog/users"), "User"),
            "./users/User"
        );
    }

    #[test]
    fn ascend() {
        assert_eq!(
            relative_specifier(&segs("blog/posts"), &segs("blog"), "User"),
            "../User"
        );
        assert_eq!(relative_specifier(&segs("a/b/c"), &[], "Root"), "../../../Root");
    }

    #[test]
    fn sibling_trees() {
        assert_eq!(
            relative_specifier(&segs("shop/orders"), &segs("shop/catalog/items"), "Item"),
            "../catalog/items/Item"
        );
        assert_eq!(
            relative_specifier(&segs("a"), &segs("b"), "B"),
            "../b/B"
        );
    }

    #[test]
    fn file_paths() {
        assert_eq!(file_path(&segs("blog"), "Post", "ts"), "blog/Post.ts");
        assert_eq!(file_path(&[], "Post", "ts"), "Post.ts");
        assert_eq!(file_path(&[], "Post", ""), "Post");
    }

    #[test]
    fn index_specifiers() {
        assert_eq!(index_specifier("index.ts", &segs("blog"), "Post"), "./blog/Post");
        assert_eq!(
            index_specifier("generated/index.ts", &segs("blog"), "Post"),
            "../blog/Post"
        );
    }
}
