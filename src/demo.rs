//! Guided walkthrough of the buffer API, printed as a console report.
//!
//! Each section exercises one group of operations and writes what it
//! observed to the given writer. Sections fail fast on the first error.

use crate::config::Config;
use crate::RingBuffer;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DemoSection {
    /// Push past capacity, then drain from the front
    Basic,
    /// Iterate a buffer of strings
    Iterators,
    /// Build elements in place
    Emplace,
    /// Index by logical position
    RandomAccess,
    /// Clone versus move
    CopyMove,
    /// Grow and shrink capacity
    Resize,
    /// Save and reload in both encodings
    Persistence,
}

impl DemoSection {
    pub const ALL: [DemoSection; 7] = [
        DemoSection::Basic,
        DemoSection::Iterators,
        DemoSection::Emplace,
        DemoSection::RandomAccess,
        DemoSection::CopyMove,
        DemoSection::Resize,
        DemoSection::Persistence,
    ];

    fn title(self) -> &'static str {
        match self {
            DemoSection::Basic => "Basic Operations",
            DemoSection::Iterators => "Iterators",
            DemoSection::Emplace => "Emplace",
            DemoSection::RandomAccess => "Random Access",
            DemoSection::CopyMove => "Copy/Move Operations",
            DemoSection::Resize => "Resize",
            DemoSection::Persistence => "File Operations",
        }
    }
}

/// Run one section, or all of them in order.
pub fn run<W: Write>(section: Option<DemoSection>, config: &Config, out: &mut W) -> Result<()> {
    let sections = match section {
        Some(s) => vec![s],
        None => DemoSection::ALL.to_vec(),
    };

    for section in sections {
        info!(section = section.title(), "Running demo section");
        writeln!(out, "{}", format!("=== {} ===", section.title()).bold().cyan())?;
        match section {
            DemoSection::Basic => basic(config.demo.capacity, out)?,
            DemoSection::Iterators => iterators(out)?,
            DemoSection::Emplace => emplace(out)?,
            DemoSection::RandomAccess => random_access(out)?,
            DemoSection::CopyMove => copy_move(out)?,
            DemoSection::Resize => resize(out)?,
            DemoSection::Persistence => persistence(config, out)?,
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", "All demonstrations completed successfully!".green())?;
    Ok(())
}

fn join<T: std::fmt::Display>(buffer: &RingBuffer<T>) -> String {
    buffer
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn basic<W: Write>(capacity: usize, out: &mut W) -> Result<()> {
    let mut buffer: RingBuffer<i64> = RingBuffer::try_new(capacity)?;
    writeln!(out, "Capacity: {}", buffer.capacity())?;

    for i in (1i64..).take(capacity.saturating_add(2)) {
        let evicted = buffer.push(i);
        write!(
            out,
            "Push {}, Size: {}, Full: {}",
            i,
            buffer.len(),
            buffer.is_full()
        )?;
        match evicted {
            Some(old) => writeln!(out, ", overwrote {}", old)?,
            None => writeln!(out)?,
        }
    }

    let mut drained = Vec::with_capacity(buffer.len());
    while !buffer.is_empty() {
        drained.push(buffer.pop()?.to_string());
    }
    writeln!(out, "Buffer contents: {}", drained.join(" "))?;
    Ok(())
}

fn iterators<W: Write>(out: &mut W) -> Result<()> {
    let mut words: RingBuffer<String> = RingBuffer::new(3)?;
    for word in ["Hello", "World", "!"] {
        words.emplace(word);
    }

    writeln!(out, "String buffer: {}", join(&words))?;
    writeln!(
        out,
        "Reversed: {}",
        words.iter().rev().cloned().collect::<Vec<_>>().join(" ")
    )?;
    Ok(())
}

fn emplace<W: Write>(out: &mut W) -> Result<()> {
    let mut pairs: RingBuffer<(i32, String)> = RingBuffer::new(2)?;
    pairs.emplace_with(|| (1, "One".to_string()));
    pairs.emplace_with(|| (2, "Two".to_string()));

    let mut rendered = Vec::new();
    while !pairs.is_empty() {
        let (number, name) = pairs.pop()?;
        rendered.push(format!("{{{}, {}}}", number, name));
    }
    writeln!(out, "Pair buffer: {}", rendered.join(" "))?;
    Ok(())
}

fn random_access<W: Write>(out: &mut W) -> Result<()> {
    let mut buffer: RingBuffer<i32> = RingBuffer::new(5)?;
    buffer.extend((0..5).map(|i| i * 10));

    let indexed = (0..buffer.len())
        .map(|i| buffer[i].to_string())
        .collect::<Vec<_>>();
    writeln!(out, "Using index: {}", indexed.join(" "))?;

    match buffer.at(buffer.len()) {
        Ok(_) => writeln!(out, "Unexpected element past the end")?,
        Err(e) => writeln!(out, "at({}) -> {}", buffer.len(), e)?,
    }
    Ok(())
}

fn copy_move<W: Write>(out: &mut W) -> Result<()> {
    let mut original: RingBuffer<i32> = RingBuffer::new(3)?;
    original.extend([1, 2, 3]);

    let copied = original.clone();
    writeln!(out, "Copied buffer size: {}", copied.len())?;

    original.push(4);
    writeln!(
        out,
        "After pushing 4 into the original: original [{}], copy [{}]",
        join(&original),
        join(&copied)
    )?;

    let moved = original;
    writeln!(out, "Moved buffer size: {}", moved.len())?;
    Ok(())
}

fn resize<W: Write>(out: &mut W) -> Result<()> {
    let mut buffer: RingBuffer<i32> = RingBuffer::new(3)?;
    buffer.push(10);
    buffer.push(20);

    writeln!(
        out,
        "Before resize - Capacity: {}, Size: {}",
        buffer.capacity(),
        buffer.len()
    )?;

    buffer.resize(5)?;
    writeln!(
        out,
        "After resize to 5 - Capacity: {}, Size: {}",
        buffer.capacity(),
        buffer.len()
    )?;

    buffer.resize(1)?;
    writeln!(
        out,
        "After resize to 1 - Capacity: {}, Size: {}, Kept: {}",
        buffer.capacity(),
        buffer.len(),
        join(&buffer)
    )?;
    Ok(())
}

fn persistence<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let mut buffer: RingBuffer<i32> = RingBuffer::new(4)?;
    buffer.extend([100, 200, 300, 400, 500]);
    writeln!(out, "Original buffer: {}", join(&buffer))?;

    let dir = config.data_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
    let stem = format!("circbuf-demo-{}", std::process::id());
    let binary_path = dir.join(format!("{stem}.bin"));
    let text_path = dir.join(format!("{stem}.txt"));

    buffer.save_binary(&binary_path)?;
    writeln!(out, "Saved to binary file: {}", binary_path.display())?;
    let mut loaded: RingBuffer<i32> = RingBuffer::new(1)?;
    loaded.load_binary_into(&binary_path)?;
    writeln!(out, "Loaded from binary: {}", join(&loaded))?;

    buffer.save_text(&text_path)?;
    writeln!(out, "Saved to text file: {}", text_path.display())?;
    let loaded = RingBuffer::<i32>::load_text(&text_path)?;
    writeln!(out, "Loaded from text: {}", join(&loaded))?;

    if config.storage.keep_files {
        writeln!(out, "Keeping files in {}", dir.display())?;
    } else {
        remove_all(&[binary_path, text_path])?;
        writeln!(out, "Temporary files removed")?;
    }
    Ok(())
}

fn remove_all(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}
