use ua_throttle::{Browser, detect};

const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";
const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0";
const SAFARI_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Safari/605.1.15";

#[test]
fn chrome_ua_with_safari_token_is_chrome() {
    assert_eq!(detect(CHROME_UA), Browser::Chrome);
    assert_eq!(detect(CHROME_UA).as_str(), "chrome");
}

#[test]
fn firefox_ua() {
    assert_eq!(detect(FIREFOX_UA), Browser::Firefox);
}

#[test]
fn safari_ua() {
    assert_eq!(detect(SAFARI_UA), Browser::Safari);
}

#[test]
fn curl_is_unknown() {
    assert_eq!(detect("curl/7.88.1"), Browser::Unknown);
    assert_eq!(detect("curl/7.88.1").to_string(), "unknown");
}

#[test]
fn detection_is_pure() {
    for ua in [CHROME_UA, FIREFOX_UA, SAFARI_UA, "curl/7.88.1", ""] {
        let first = detect(ua);
        for _ in 0..3 {
            assert_eq!(detect(ua), first);
        }
    }
}
