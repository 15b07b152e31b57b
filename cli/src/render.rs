//! Shared output formatting for every command.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use diary_core::{Comment, Diary, UploadedImage};
use serde::Serialize;

use crate::args::OutputFormat;

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn diary(&self, out: &mut impl Write, diary: &Diary) -> Result<()> {
        if self.format == OutputFormat::Json {
            return json(out, diary);
        }
        writeln!(out, "Diary #{} by {} ({})", diary.id, diary.author, diary.created_at)?;
        writeln!(out)?;
        for line in diary.content.lines() {
            writeln!(out, "    {line}")?;
        }
        if diary.comments.is_empty() {
            writeln!(out)?;
            writeln!(out, "No comments yet.")?;
        } else {
            writeln!(out)?;
            writeln!(out, "Comments ({}):", diary.comments.len())?;
            for comment in &diary.comments {
                write_comment_line(out, comment)?;
            }
        }
        Ok(())
    }

    pub fn comment(&self, out: &mut impl Write, comment: &Comment) -> Result<()> {
        if self.format == OutputFormat::Json {
            return json(out, comment);
        }
        write_comment_line(out, comment)
    }

    pub fn uploaded(&self, out: &mut impl Write, image: &UploadedImage) -> Result<()> {
        if self.format == OutputFormat::Json {
            return json(out, image);
        }
        writeln!(out, "{}", image.url)?;
        Ok(())
    }

    pub fn saved(&self, out: &mut impl Write, path: &Path, len: usize) -> Result<()> {
        if self.format == OutputFormat::Json {
            return json(out, &serde_json::json!({ "path": path.display().to_string(), "bytes": len }));
        }
        writeln!(out, "wrote {len} bytes to {}", path.display())?;
        Ok(())
    }
}

fn write_comment_line(out: &mut impl Write, comment: &Comment) -> Result<()> {
    writeln!(
        out,
        "  #{} {} ({}): {}",
        comment.id, comment.author, comment.created_at, comment.content
    )?;
    Ok(())
}

fn json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
