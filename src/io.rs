use std::fs::File;
use std::io::BufRead;

use crate::error::SimError;

/// Opens a trace file for line-by-line reading
pub fn get_reader(file: File) -> Result<impl BufRead, SimError> {
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        use std::io::BufReader;
        // Trace files routinely run to hundreds of MB, so use a generous buffer
        const BUFFER_SIZE: usize = 1 << 20;
        Ok(BufReader::with_capacity(BUFFER_SIZE, file))
    }
    // Memory map the file for speed on unix systems
    #[cfg(unix)]
    {
        use std::io::Cursor;
        use memmap2::{Advice, Mmap};
        unsafe {
            let m = Mmap::map(&file)?;
            m.advise(Advice::Sequential)?;
            Ok(Cursor::new(m))
        }
    }
}
