//! ICE 候选字段分类
//!
//! 把一条原始候选字符串拆成 IP、端口和“其他”三类令牌。
//! 三种提取相互独立地作用于同一输入，同一子串可能同时落入多个类别。

use ipfinder_common::IpMatching;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::net::IpAddr;

/// 点分四段数字，或任意十六进制/冒号串（大小写不敏感）
static IP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:[0-9]{1,3}\.){3}[0-9]{1,3}|[a-f0-9:]+").expect("IP pattern is valid")
});

/// 空白或冒号之后的 1-5 位数字；其后必须是空白或输入结尾，在 `extract_ports` 中检查
static PORT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s:][0-9]{1,5}").expect("port pattern is valid"));

/// 小写字母串，或任意一个非字母、非数字、非空白字符
static OTHER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+|[^a-zA-Z0-9\s]").expect("other pattern is valid"));

/// 单条候选的分类结果，按出现顺序排列，未去重
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub ips: Vec<String>,
    pub ports: Vec<String>,
    pub others: Vec<String>,
}

/// 以宽松 IP 匹配分类候选
pub fn classify(candidate: &str) -> Classification {
    classify_with(candidate, IpMatching::Permissive)
}

/// 按指定的 IP 匹配模式分类候选
pub fn classify_with(candidate: &str, ip_matching: IpMatching) -> Classification {
    Classification {
        ips: extract_ips(candidate, ip_matching),
        ports: extract_ports(candidate),
        others: extract_others(candidate),
    }
}

fn extract_ips(candidate: &str, ip_matching: IpMatching) -> Vec<String> {
    IP_PATTERN
        .find_iter(candidate)
        .map(|m| m.as_str())
        .filter(|token| match ip_matching {
            IpMatching::Permissive => true,
            IpMatching::Strict => token.parse::<IpAddr>().is_ok(),
        })
        .map(str::to_string)
        .collect()
}

fn extract_ports(candidate: &str) -> Vec<String> {
    // 数字串超过 5 位或后随非空白字符时，整段不算端口；
    // 被拒绝的片段内部不含分隔符，因此从其末尾继续搜索不会漏掉匹配
    PORT_PATTERN
        .find_iter(candidate)
        .filter(|m| {
            candidate[m.end()..]
                .chars()
                .next()
                .is_none_or(char::is_whitespace)
        })
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

fn extract_others(candidate: &str) -> Vec<String> {
    OTHER_PATTERN
        .find_iter(candidate)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST_V4: &str = "candidate:1 1 udp 2122260223 192.168.1.5 54321 typ host generation 0";
    const HOST_V6: &str =
        "candidate:2 1 udp 2122262783 fe80::1c2b:3cff:fe4d:5e6f 50000 typ host generation 0";

    #[test]
    fn test_host_candidate_example() {
        let c = classify(HOST_V4);

        assert!(c.ips.contains(&"192.168.1.5".to_string()));
        assert!(c.ports.contains(&"54321".to_string()));
        for token in ["candidate", "udp", "typ", "host", "generation", ":"] {
            assert!(c.others.contains(&token.to_string()), "missing {token}");
        }
    }

    #[test]
    fn test_permissive_ip_pattern_over_matches_hex_fragments() {
        let c = classify(HOST_V4);
        assert_eq!(
            c.ips,
            vec![
                "ca",
                "d",
                "da",
                "e:1",
                "1",
                "d",
                "2122260223",
                "192.168.1.5",
                "54321",
                "e",
                "e",
                "a",
                "0"
            ]
        );
    }

    #[test]
    fn test_strict_ip_matching_keeps_real_addresses() {
        let v4 = classify_with(HOST_V4, IpMatching::Strict);
        assert_eq!(v4.ips, vec!["192.168.1.5"]);

        let v6 = classify_with(HOST_V6, IpMatching::Strict);
        assert_eq!(v6.ips, vec!["fe80::1c2b:3cff:fe4d:5e6f"]);
    }

    #[test]
    fn test_ipv6_address_is_one_token() {
        let c = classify(HOST_V6);
        assert!(c.ips.contains(&"fe80::1c2b:3cff:fe4d:5e6f".to_string()));
        assert!(c.ports.contains(&"50000".to_string()));
    }

    #[test]
    fn test_port_boundaries() {
        let c = classify(HOST_V4);
        // ":1" 前导冒号不会被 trim 掉；10 位优先级和 IP 中的数字都不是端口
        assert_eq!(c.ports, vec![":1", "1", "54321", "0"]);
    }

    #[test]
    fn test_port_rejects_long_runs_and_accepts_adjacent_ports() {
        assert!(classify("x 123456 y").ports.is_empty());
        assert_eq!(classify("a 1 2 3").ports, vec!["1", "2", "3"]);
        assert_eq!(classify("raddr 0.0.0.0 rport 9").ports, vec!["9"]);
        assert!(classify("port 80/udp").ports.is_empty());
    }

    #[test]
    fn test_other_tokens() {
        let c = classify("candidate:3 1 TCP 1518280447 10.0.0.2 9 typ host tcptype active");
        assert_eq!(
            c.others,
            vec![
                "candidate",
                ":",
                ".",
                ".",
                ".",
                "typ",
                "host",
                "tcptype",
                "active"
            ]
        );
        // 大写字母既不是小写串，也不属于“非字母”字符
        assert!(!c.others.iter().any(|t| t.chars().any(|ch| ch.is_ascii_uppercase())));
        assert!(c.others.contains(&".".to_string()));
        assert!(c.others.contains(&"tcptype".to_string()));
    }

    #[test]
    fn test_punctuation_is_captured_regardless_of_ip_match() {
        let c = classify("candidate:4 1 udp 1 10.1.2.3 4000 typ srflx raddr 0.0.0.0 rport 0/x");
        assert!(c.others.contains(&".".to_string()));
        assert!(c.others.contains(&"/".to_string()));
        assert!(c.others.contains(&"srflx".to_string()));
        assert!(c.ips.contains(&"10.1.2.3".to_string()));
        assert!(c.ips.contains(&"0.0.0.0".to_string()));
    }

    #[test]
    fn test_classify_is_deterministic() {
        for candidate in [HOST_V4, HOST_V6, "", "   ", "candidate:x"] {
            assert_eq!(classify(candidate), classify(candidate));
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(classify(""), Classification::default());
    }
}
