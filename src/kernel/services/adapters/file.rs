//! 项目文件读写

use ropey::Rope;
use std::io::Write;
use std::path::Path;

pub fn read_project_text(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

/// 逐块写出 Rope，避免先拼成一个大字符串
pub fn write_rope_to_path(path: &Path, rope: &Rope) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    for chunk in rope.chunks() {
        writer.write_all(chunk.as_bytes())?;
    }
    writer.flush()
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/file.rs"]
mod tests;
