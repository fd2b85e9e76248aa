use crate::domain::model::Domain;
use url::Url;

const WWW_PREFIX: &str = "www.";

/// 把任意 URL 或網域字串轉成乾淨的主機名稱。
///
/// e.g. `https://www.example.com/path` → `example.com`
///
/// 有 scheme 時取 URL 的 host（`url` 會轉成小寫）；否則把整段字串當成 host。
/// `www.` 只比對小寫字面值。每一步（trim、取 host、去掉一個 `www.`）重複到結果不再改變，
/// 確保 `normalize(normalize(x)) == normalize(x)`。
/// 永遠不會失敗：取不到 host 時回傳去除空白後的原字串。
pub fn normalize(raw: &str) -> Domain {
    let mut current = raw.trim().to_string();
    loop {
        let next = normalize_step(&current);
        if next == current {
            break;
        }
        current = next;
    }

    Domain::from_normalized(current)
}

// 取 host 之後的字串不再帶 scheme，之後每一步只會變短，必定收斂
fn normalize_step(value: &str) -> String {
    let trimmed = value.trim();

    let hostname = Url::parse(trimmed)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| trimmed.to_string());

    match hostname.strip_prefix(WWW_PREFIX).map(str::trim) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => hostname,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url_is_reduced_to_hostname() {
        assert_eq!(normalize("https://www.example.com/path").as_str(), "example.com");
        assert_eq!(
            normalize("http://shop.example.com:8080/a?b=c#d").as_str(),
            "shop.example.com"
        );
    }

    #[test]
    fn test_bare_domain_is_unchanged() {
        assert_eq!(normalize("example.com").as_str(), "example.com");
        assert_eq!(normalize("  example.com \n").as_str(), "example.com");
        assert_eq!(normalize("www.example.com").as_str(), "example.com");
    }

    #[test]
    fn test_www_prefix_match_is_case_sensitive_for_bare_input() {
        // 沒有 scheme 時保留原大小寫，`WWW.` 不是字面上的 `www.`
        assert_eq!(normalize("WWW.Example.com").as_str(), "WWW.Example.com");
        // 有 scheme 時 host 先被轉成小寫，接著才比對前綴
        assert_eq!(normalize("https://WWW.Example.com").as_str(), "example.com");
    }

    #[test]
    fn test_unparseable_input_is_returned_trimmed() {
        assert_eq!(normalize("  not a url  ").as_str(), "not a url");
        assert_eq!(normalize("mailto:someone").as_str(), "mailto:someone");
        assert_eq!(normalize("https://").as_str(), "https://");
    }

    #[test]
    fn test_whitespace_after_www_is_trimmed() {
        assert_eq!(normalize("www. http://a.com").as_str(), "a.com");
        assert_eq!(normalize("www.\tb.com").as_str(), "b.com");
        assert_eq!(normalize("www. www.c.com").as_str(), "c.com");
    }

    #[test]
    fn test_bare_www_is_not_emptied() {
        assert_eq!(normalize("www.").as_str(), "www.");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "https://www.example.com/path",
            "example.com",
            "WWW.Example.com",
            "https://www.www.example.com",
            "http://EXAMPLE.com/",
            "  www.petco.com ",
            "localhost:3000",
            "www.",
            "",
            "www. http://a.com",
            "www.\tb.com",
            "www. www.c.com",
        ];

        for input in inputs {
            let once = normalize(input);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "normalize is not idempotent for {:?}", input);
        }
    }
}
