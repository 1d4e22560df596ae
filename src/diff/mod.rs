pub mod file;
pub mod hunk;
pub mod patch;

pub use file::{Diff, FileMode};
pub use hunk::{Hunk, Line, LineKind};
pub use patch::{Parsed, Patch};

/// Format parsed diffs for display with explicit line numbers.
///
/// Each hunk line gets its previous and new line number, blank where the
/// line does not exist on that side.
///
/// Example output:
/// ```text
/// a.txt:
///   @@ -1,2 +1,3 @@
///     1     1  line1
///           2 +line2
///     2     3  line3
/// ```
pub fn format_listing(parsed: &Parsed) -> String {
    let mut result = String::new();

    match parsed {
        Parsed::Diffs(diffs) => push_diffs(&mut result, diffs),
        Parsed::Patches(patches) => {
            for patch in patches {
                if !result.is_empty() {
                    result.push('\n');
                }
                result.push_str(&format!("commit {}\n", patch.commit_sha));
                if let Some(timestamp) = &patch.timestamp {
                    result.push_str(&format!("Date: {}\n", timestamp));
                }
                push_diffs(&mut result, &patch.diffs);
            }
        }
    }

    result
}

fn push_diffs(result: &mut String, diffs: &[Diff]) {
    for diff in diffs {
        // Blank line between files
        if !result.is_empty() {
            result.push('\n');
        }
        result.push_str(&diff.display_name());
        result.push_str(mode_suffix(diff.file_mode));
        result.push_str(":\n");

        for (i, hunk) in diff.hunks.iter().enumerate() {
            if i > 0 {
                result.push('\n');
            }
            result.push_str(&format!("  {}\n", hunk.header()));

            for line in &hunk.lines {
                result.push_str(&format!(
                    "{:>5} {:>5} {}{}\n",
                    lino(line.previous_lino),
                    lino(line.new_lino),
                    line.kind.marker(),
                    line.content
                ));
            }
        }
    }
}

fn lino(number: Option<u32>) -> String {
    number.map(|n| n.to_string()).unwrap_or_default()
}

fn mode_suffix(mode: FileMode) -> &'static str {
    match mode {
        FileMode::Unchanged => "",
        FileMode::New => " (new file)",
        FileMode::Deleted => " (deleted)",
    }
}

/// One row per file: additions, deletions and name.
pub fn format_summary(parsed: &Parsed) -> String {
    parsed
        .diffs()
        .map(|diff| {
            format!(
                "{:>5}+ {:>5}- {}{}\n",
                diff.additions(),
                diff.deletions(),
                diff.display_name(),
                mode_suffix(diff.file_mode)
            )
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parse;
    use similar_asserts::assert_eq;

    #[test]
    fn listing_single_file() {
        let text = r#"diff --git a/a.txt b/a.txt
index d3d..ac0 100644
--- a/a.txt
+++ b/a.txt
@@ -1,2 +1,3 @@
 line1
+line2
 line3
"#;
        let formatted = format_listing(&parse(text).unwrap());
        insta::assert_snapshot!(formatted);
    }

    #[test]
    fn listing_non_contiguous_hunks() {
        let text = r#"diff --git a/flake.nix b/flake.nix
index abc1234..def5678 100644
--- a/flake.nix
+++ b/flake.nix
@@ -136,0 +137 @@
+      debug = true;
@@ -140,2 +142 @@ outputs
-        ./old.nix
-        ./older.nix
+        ./flake-modules/home-manager.nix
"#;
        let formatted = format_listing(&parse(text).unwrap());
        insta::assert_snapshot!(formatted);
    }

    #[test]
    fn listing_format_patch() {
        let text = r#"From 21e02a7fd129a0c17e3dfbf39c6e69240c3dc3d2 Mon Sep 17 00:00:00 2001
From: Jane Doe <jane@example.com>
Date: Fri, 15 Apr 2022 12:22:33 +0200
Subject: [PATCH] Replace package.json with blabla.rb

---
 blabla.rb    | 2 ++
 package.json | 1 -
 2 files changed, 2 insertions(+), 1 deletion(-)

diff --git a/blabla.rb b/blabla.rb
new file mode 100644
index 0000000..d3dfbe4
--- /dev/null
+++ b/blabla.rb
@@ -0,0 +1,2 @@
+def test1
+end
diff --git a/package.json b/package.json
deleted file mode 100644
index 3ffb801..0000000
--- a/package.json
+++ /dev/null
@@ -1 +0,0 @@
-{}
--
2.35.1
"#;
        let formatted = format_listing(&parse(text).unwrap());
        insta::assert_snapshot!(formatted);
    }

    #[test]
    fn listing_empty_input() {
        assert_eq!(format_listing(&parse("").unwrap()), "");
    }

    #[test]
    fn summary_counts_per_file() {
        let text = r#"diff --git a/gtk.nix b/gtk.nix
index 2ce966d..93d8dbc 100644
--- a/gtk.nix
+++ b/gtk.nix
@@ -10,2 +10,3 @@ line 9
-    gtk.theme.name = "Adwaita";
-    gtk.iconTheme.name = "Papirus";
+    # Theme managed by Stylix
+    gtk.iconTheme.name = "Papirus-Dark";
+    gtk.cursorTheme.size = 24;
diff --git a/old.nix b/new.nix
similarity index 100%
rename from old.nix
rename to new.nix
diff --git a/gone.nix b/gone.nix
deleted file mode 100644
index 6f2e06d..0000000
--- a/gone.nix
+++ /dev/null
@@ -1 +0,0 @@
-{ }
"#;
        let summary = format_summary(&parse(text).unwrap());
        assert_eq!(
            summary,
            "    3+     2- gtk.nix\n    0+     0- old.nix -> new.nix\n    0+     1- gone.nix (deleted)\n"
        );
    }
}
