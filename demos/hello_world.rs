use anyhow::{Context, bail};
use ft_kit::{FileTree, Stat, TreeConfig};

fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug shows every insert and removal
    env_logger::init();

    let mut tree = FileTree::with_config(TreeConfig::default().with_children_capacity(4));
    tree.init()?;

    // creates `/docs` and `/docs/drafts` in one call
    tree.insert_directory("/docs/drafts")?;

    // `/docs` already exists, so only the file node is created
    tree.insert_file("/docs/first.txt", Some(b"Hello".to_vec()))?;
    tree.insert_file("/docs/drafts/second.txt", Some(b"World".to_vec()))?;
    assert!(tree.contains_file("/docs/first.txt"));

    // a file can never be the root, and nothing may live outside `/docs`
    if tree.insert_file("/second.txt", None).is_ok() {
        bail!("a root-level file must be rejected");
    }

    let first = tree
        .get_file_contents("/docs/first.txt")
        .context("first.txt has no contents")?;
    let second = tree
        .get_file_contents("/docs/drafts/second.txt")
        .context("second.txt has no contents")?;
    println!(
        "{}, {}!",
        String::from_utf8_lossy(first),
        String::from_utf8_lossy(second)
    );

    // ownership of the old buffer comes back to us
    let old = tree.try_replace_file_contents("/docs/first.txt", Some(b"Hi".to_vec()))?;
    assert_eq!(old.as_deref(), Some(&b"Hello"[..]));
    if let Stat::File { size } = tree.stat("/docs/first.txt")? {
        println!("first.txt is now {size} bytes");
    }

    print!("{tree}");

    tree.remove_directory("/docs/drafts")?;
    println!("{} node(s) left", tree.len());

    // frees whatever is left and returns the tree to the uninitialized state
    tree.destroy()?;
    Ok(())
}
