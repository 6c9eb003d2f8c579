mod bullet_points;
mod prompt;

#[cfg(test)]
pub use bullet_points::MemoryLineWriter;
pub use bullet_points::{BulletPointPrinter, LineWriter};
pub use prompt::{prompt_select, prompt_with_default};
