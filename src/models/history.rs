use super::Winner;

/// 中奖历史（最新在前），只允许追加或整体清空
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<Winner>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录中奖者：已存在相同 id 时原地更新祝贺语，否则插入到最前
    pub fn record(&mut self, winner: Winner) {
        if let Some(existing) = self.entries.iter_mut().find(|w| w.id == winner.id) {
            existing.cheer_message = winner.cheer_message;
            return;
        }
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.push(winner);
        entries.extend(self.entries.drain(..));
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.entries = Vec::new();
    }

    pub fn entries(&self) -> &[Winner] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Winner> {
        self.entries.iter().find(|w| w.id == id)
    }
}
