//! Human-readable rendering of ragged buffers.
//!
//! ```text
//! RaggedBuffer([
//!     [
//!         [2, 3, 1],
//!         [1, 2, 3],
//!     ],
//!     [],
//! ], '2 * var * 3 * f32)
//! ```

use std::fmt;

use crate::buffer::RaggedBuffer;
use crate::scalar::Element;

impl<T: Element> fmt::Display for RaggedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RaggedBuffer([")?;
        for range in &self.sequences {
            if range.is_empty() {
                writeln!(f, "    [],")?;
                continue;
            }
            writeln!(f, "    [")?;
            for item in range.clone() {
                f.write_str("        [")?;
                for (c, value) in self.item(item).iter().enumerate() {
                    if c > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                writeln!(f, "],")?;
            }
            writeln!(f, "    ],")?;
        }
        write!(
            f,
            "], '{} * var * {} * {})",
            self.size0(),
            self.features,
            T::DTYPE
        )
    }
}
