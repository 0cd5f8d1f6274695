/// 将输入文本解析为候选列表：每个非空行一个候选，去除首尾空白，保留顺序与重复项
pub fn parse_candidates(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 将候选列表写回为文本（每行一个）
pub fn join_candidates(candidates: &[String]) -> String {
    candidates.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidates() {
        assert_eq!(
            parse_candidates("  Teddy bear \n\n\tGift card\n   \nMug"),
            vec!["Teddy bear", "Gift card", "Mug"]
        );
        assert_eq!(parse_candidates("A\r\nB\r\n"), vec!["A", "B"]);
        assert!(parse_candidates("").is_empty());
        assert!(parse_candidates(" \n \n").is_empty());
    }

    #[test]
    fn test_parse_keeps_duplicates_in_order() {
        assert_eq!(parse_candidates("A\nB\nA\nA"), vec!["A", "B", "A", "A"]);
    }

    #[test]
    fn test_join_then_parse_reproduces_list() {
        let list = parse_candidates("ตุ๊กตาหมี\n  Voucher 500  \nA\nA\n");
        assert_eq!(parse_candidates(&join_candidates(&list)), list);
        assert_eq!(join_candidates(&[]), "");
    }
}
