use std::io::Write;

/// Observer notified after every processed chunk of input.
pub trait Progress {
    fn update(&mut self, done: u64, total: u64);

    fn finish(&mut self) {}
}

/// Ignores every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {
    fn update(&mut self, _done: u64, _total: u64) {}
}

/// Prints `\rNN% completed` each time the integer percentage grows.
pub struct Percent<W: Write> {
    out: W,
    last: Option<u64>,
}

impl<W: Write> Percent<W> {
    pub fn new(out: W) -> Self {
        Percent { out, last: None }
    }
}

impl Percent<std::io::Stderr> {
    pub fn stderr() -> Self {
        Percent::new(std::io::stderr())
    }
}

impl<W: Write> Progress for Percent<W> {
    fn update(&mut self, done: u64, total: u64) {
        let pct = if total == 0 {
            100
        } else {
            (done as u128 * 100 / total as u128) as u64
        };
        if self.last.is_some_and(|last| last >= pct) {
            return;
        }
        self.last = Some(pct);
        let _ = write!(self.out, "\r{}% completed  ", pct);
        let _ = self.out.flush();
    }

    fn finish(&mut self) {
        if self.last.is_some() {
            let _ = writeln!(self.out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_only_when_percentage_grows() {
        let mut buf = Vec::new();
        {
            let mut progress = Percent::new(&mut buf);
            progress.update(1, 200);
            progress.update(2, 200);
            progress.update(3, 200);
            progress.update(200, 200);
            progress.finish();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "\r0% completed  \r1% completed  \r100% completed  \n");
    }
}
