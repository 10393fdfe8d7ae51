//! The `/_stats` wire format. Field order is fixed; the monitor parses it positionally.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSample {
    pub load_average: f64,
    pub mem_total: u64,
    pub mem_used: u64,
    pub disk_total: u64,
    pub disk_used: u64,
    // link capacity and observed rx+tx, bytes/s
    pub net_total: u64,
    pub net_used: u64,
}

impl StatsSample {
    /// `load,memTotal,memUsed,diskTotal,diskUsed,netTotal,netUsed`
    pub fn to_line(&self) -> String {
        format!(
            "{:.2},{},{},{},{},{},{}",
            self.load_average,
            self.mem_total,
            self.mem_used,
            self.disk_total,
            self.disk_used,
            self.net_total,
            self.net_used
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_has_seven_numeric_fields() {
        let s = StatsSample {
            load_average: 1.234,
            mem_total: 16 << 30,
            mem_used: 3 << 30,
            disk_total: 500 << 30,
            disk_used: 0,
            net_total: 125_000_000,
            net_used: 42,
        };
        let line = s.to_line();
        assert_eq!(
            line,
            "1.23,17179869184,3221225472,536870912000,0,125000000,42"
        );
        let fields: Vec<f64> = line.split(',').map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), 7);
    }
}
