/// Size of one packed PCB record in the job stream.
pub const PCB_SIZE: usize = 38;

pub const NAME_LEN: usize = 16;

/// The process control block. Holds the job metadata read from the PCB file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessControlBlock {
    pub priority: i8,
    pub name: [u8; NAME_LEN],
    pub process_id: i32,
    pub activity_status: i8,
    pub base_register: i32,
    pub limit_register: i64,
    pub burst_time: i32,
}

impl ProcessControlBlock {
    /// Decodes one little-endian record. Layout:
    /// priority(1) name(16) pid(4) status(1) base(4) limit(8) burst(4).
    pub fn from_bytes(record: &[u8; PCB_SIZE]) -> ProcessControlBlock {
        let mut name = [0; NAME_LEN];
        name.copy_from_slice(&record[1..17]);

        ProcessControlBlock {
            priority: record[0] as i8,
            name,
            process_id: i32::from_le_bytes(Self::field(record, 17)),
            activity_status: record[21] as i8,
            base_register: i32::from_le_bytes(Self::field(record, 22)),
            limit_register: i64::from_le_bytes(Self::field(record, 26)),
            burst_time: i32::from_le_bytes(Self::field(record, 34)),
        }
    }

    pub fn to_bytes(&self) -> [u8; PCB_SIZE] {
        let mut record = [0; PCB_SIZE];
        record[0] = self.priority as u8;
        record[1..17].copy_from_slice(&self.name);
        record[17..21].copy_from_slice(&self.process_id.to_le_bytes());
        record[21] = self.activity_status as u8;
        record[22..26].copy_from_slice(&self.base_register.to_le_bytes());
        record[26..34].copy_from_slice(&self.limit_register.to_le_bytes());
        record[34..38].copy_from_slice(&self.burst_time.to_le_bytes());
        record
    }

    fn field<const N: usize>(record: &[u8; PCB_SIZE], start: usize) -> [u8; N] {
        let mut bytes = [0; N];
        bytes.copy_from_slice(&record[start..start + N]);
        bytes
    }

    pub fn get_name(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    /// `limit - base`, clamped to the `i64` range for out-of-range registers.
    pub fn get_memory_footprint(&self) -> i64 {
        self.limit_register.saturating_sub(self.base_register as i64)
    }
}

/// Exclusively owned handle to one job. Moves between processor queues,
/// never cloned, so a job can only ever sit in one place.
#[derive(Debug)]
pub struct Job {
    pub pcb: ProcessControlBlock,
    original_burst: i32,
    dispatches: u32,
}

impl Job {
    pub fn new(pcb: ProcessControlBlock) -> Job {
        Job {
            original_burst: pcb.burst_time,
            pcb,
            dispatches: 0,
        }
    }

    pub fn get_id(&self) -> i32 {
        self.pcb.process_id
    }

    pub fn get_original_burst(&self) -> i32 {
        self.original_burst
    }

    pub fn get_dispatches(&self) -> u32 {
        self.dispatches
    }

    pub(crate) fn mark_dispatched(&mut self) {
        self.dispatches += 1;
    }
}

#[cfg(test)]
pub(crate) fn test_pcb(process_id: i32, priority: i8, burst_time: i32) -> ProcessControlBlock {
    let mut name = [0; NAME_LEN];
    let label = format!("job{}", process_id);
    name[..label.len()].copy_from_slice(label.as_bytes());

    ProcessControlBlock {
        priority,
        name,
        process_id,
        activity_status: 1,
        base_register: 100 * process_id,
        limit_register: 100 * process_id as i64 + 64,
        burst_time,
    }
}
