//! Raw, untyped log rows as read from the source file.

use serde::{Deserialize, Serialize};

/// Column names of the allocator log, in the order log producers write them.
pub mod columns {
    pub const TIMESTAMP: &str = "Timestamp";
    pub const OPERATION: &str = "Operation";
    pub const BLOCK_SIZE: &str = "BlockSize";
    pub const TIME: &str = "Time";
    pub const FRAGMENTATION: &str = "Fragmentation";
    pub const SOURCE: &str = "Source";
    pub const CALL_STACK: &str = "CallStack";
    pub const MEMORY_ADDRESS: &str = "MemoryAddress";
    pub const THREAD_ID: &str = "ThreadID";
    pub const ALLOCATION_ID: &str = "AllocationID";

    /// Every column a log file must carry.
    pub const ALL: [&str; 10] = [
        TIMESTAMP,
        OPERATION,
        BLOCK_SIZE,
        TIME,
        FRAGMENTATION,
        SOURCE,
        CALL_STACK,
        MEMORY_ADDRESS,
        THREAD_ID,
        ALLOCATION_ID,
    ];
}

/// One input row. `None` means the cell was null or absent on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub timestamp: Option<String>,
    pub operation: Option<String>,
    pub block_size: Option<String>,
    pub time: Option<String>,
    pub fragmentation: Option<String>,
    pub memory_address: Option<String>,
    pub thread_id: Option<String>,
    pub allocation_id: Option<String>,
    pub source: Option<String>,
    pub call_stack: Option<String>,
}

impl RawRecord {
    /// Returns the cell for a column name, if the name is known.
    pub fn get(&self, column: &str) -> Option<&str> {
        let cell = match column {
            columns::TIMESTAMP => &self.timestamp,
            columns::OPERATION => &self.operation,
            columns::BLOCK_SIZE => &self.block_size,
            columns::TIME => &self.time,
            columns::FRAGMENTATION => &self.fragmentation,
            columns::MEMORY_ADDRESS => &self.memory_address,
            columns::THREAD_ID => &self.thread_id,
            columns::ALLOCATION_ID => &self.allocation_id,
            columns::SOURCE => &self.source,
            columns::CALL_STACK => &self.call_stack,
            _ => return None,
        };
        cell.as_deref()
    }

    /// Sets the cell for a column name. Unknown names are ignored.
    pub fn set(&mut self, column: &str, value: Option<String>) {
        let cell = match column {
            columns::TIMESTAMP => &mut self.timestamp,
            columns::OPERATION => &mut self.operation,
            columns::BLOCK_SIZE => &mut self.block_size,
            columns::TIME => &mut self.time,
            columns::FRAGMENTATION => &mut self.fragmentation,
            columns::MEMORY_ADDRESS => &mut self.memory_address,
            columns::THREAD_ID => &mut self.thread_id,
            columns::ALLOCATION_ID => &mut self.allocation_id,
            columns::SOURCE => &mut self.source,
            columns::CALL_STACK => &mut self.call_stack,
            _ => return,
        };
        *cell = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_set_by_column_name() {
        let mut record = RawRecord::default();
        for (idx, column) in columns::ALL.iter().enumerate() {
            record.set(column, Some(idx.to_string()));
        }
        for (idx, column) in columns::ALL.iter().enumerate() {
            assert_eq!(record.get(column), Some(idx.to_string().as_str()));
        }
        assert_eq!(record.get("Unknown"), None);
    }
}
