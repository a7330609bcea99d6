//! 收集结果快照与输出整形

use crate::accumulator::Accumulator;
use serde::Serialize;

/// 输出拼接使用的分隔符
pub const JOIN_SEPARATOR: &str = ", ";

/// 一个收集周期结束时三类集合的快照（插入顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatherReport {
    pub ips: Vec<String>,
    pub ports: Vec<String>,
    pub others: Vec<String>,
}

impl GatherReport {
    /// 含 `.` 的 IP 令牌
    pub fn ipv4(&self) -> Vec<&str> {
        self.ips
            .iter()
            .map(String::as_str)
            .filter(|ip| ip.contains('.'))
            .collect()
    }

    /// 含 `:` 的 IP 令牌
    pub fn ipv6(&self) -> Vec<&str> {
        self.ips
            .iter()
            .map(String::as_str)
            .filter(|ip| ip.contains(':'))
            .collect()
    }

    pub fn all_ips_joined(&self) -> String {
        self.ips.join(JOIN_SEPARATOR)
    }

    pub fn ipv4_joined(&self) -> String {
        self.ipv4().join(JOIN_SEPARATOR)
    }

    pub fn ipv6_joined(&self) -> String {
        self.ipv6().join(JOIN_SEPARATOR)
    }

    pub fn ports_joined(&self) -> String {
        self.ports.join(JOIN_SEPARATOR)
    }

    pub fn others_joined(&self) -> String {
        self.others.join(JOIN_SEPARATOR)
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty() && self.ports.is_empty() && self.others.is_empty()
    }
}

impl From<&Accumulator> for GatherReport {
    fn from(acc: &Accumulator) -> Self {
        Self {
            ips: acc.ips.to_vec(),
            ports: acc.ports.to_vec(),
            others: acc.others.to_vec(),
        }
    }
}
