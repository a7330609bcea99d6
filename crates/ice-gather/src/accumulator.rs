//! 去重累积集合
//!
//! 候选事件处理器把分类结果合并到这里；插入时去重，输出保持插入顺序。

use crate::classifier::Classification;
use std::collections::HashSet;
use tracing::debug;

/// 保持插入顺序的字符串集合
#[derive(Debug, Default, Clone)]
pub struct OrderedSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入新值，已存在时返回 false
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.order.push(value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.order.clone()
    }
}

/// 一个收集周期内的三类累积集合
#[derive(Debug, Default, Clone)]
pub struct Accumulator {
    pub ips: OrderedSet,
    pub ports: OrderedSet,
    pub others: OrderedSet,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ips.clear();
        self.ports.clear();
        self.others.clear();
    }

    /// 合并一个候选的分类结果
    pub fn absorb(&mut self, classification: Classification) {
        for ip in classification.ips {
            debug!("IP found: {}", ip);
            self.ips.insert(ip);
        }
        for port in classification.ports {
            debug!("Port found: {}", port);
            self.ports.insert(port);
        }
        for other in classification.others {
            debug!("Other candidate info: {}", other);
            self.others.insert(other);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty() && self.ports.is_empty() && self.others.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    #[test]
    fn test_ordered_set_dedup_keeps_first_position() {
        let mut set = OrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert_eq!(set.to_vec(), vec!["b", "a"]);
        assert!(set.contains("a"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_absorb_same_candidate_twice_is_idempotent() {
        let candidate = "candidate:1 1 udp 2122260223 192.168.1.5 54321 typ host generation 0";
        let mut once = Accumulator::new();
        once.absorb(classify(candidate));

        let mut twice = Accumulator::new();
        twice.absorb(classify(candidate));
        twice.absorb(classify(candidate));

        assert_eq!(once.ips.len(), twice.ips.len());
        assert_eq!(once.ports.len(), twice.ports.len());
        assert_eq!(once.others.len(), twice.others.len());
        assert_eq!(once.ips.to_vec(), twice.ips.to_vec());
    }

    #[test]
    fn test_clear_resets_all_sets() {
        let mut acc = Accumulator::new();
        acc.absorb(classify("candidate:2 1 udp 100 10.0.0.1 5000 typ host"));
        assert!(!acc.is_empty());
        acc.clear();
        assert!(acc.is_empty());
        assert!(acc.ips.insert("10.0.0.1"));
    }
}
