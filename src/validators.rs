//! Input Validators
//!
//! 스키마 레벨 검증을 넘어서는 도메인 검증 로직 모음
//! - 사업자등록번호 체크섬 (국세청 가중합 알고리즘)
//! - SNS 채널 URL 플랫폼별 형식
//! - 비밀번호 정책 / 휴대폰 번호 / 최소 연령

use chrono::NaiveDate;

use crate::types::SnsChannelType;

/// 사업자번호에서 하이픈 제거 (저장은 항상 정규화된 10자리)
pub fn normalize_business_number(business_number: &str) -> String {
    business_number.replace('-', "")
}

/// 사업자등록번호 체크섬 검증
///
/// 가중치 [1,3,7,1,3,7,1,3,5]를 앞 9자리에 곱해 합산하고,
/// 9번째 자리는 5를 곱한 값의 10 몫을 추가로 더한 뒤
/// (10 - sum % 10) % 10 이 검증 자리와 일치해야 함
pub fn validate_business_number(business_number: &str) -> bool {
    let cleaned = normalize_business_number(business_number);

    if cleaned.len() != 10 || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = cleaned.chars().filter_map(|c| c.to_digit(10)).collect();
    const CHECK_KEY: [u32; 9] = [1, 3, 7, 1, 3, 7, 1, 3, 5];

    let mut sum: u32 = digits[..9]
        .iter()
        .zip(CHECK_KEY.iter())
        .map(|(d, k)| d * k)
        .sum();

    sum += (digits[8] * 5) / 10;

    let checksum = (10 - (sum % 10)) % 10;
    checksum == digits[9]
}

/// SNS 채널 URL 플랫폼별 형식 검증
///
/// naver: https://blog.naver.com/<id>
/// youtube: https://[www.]youtube.com/@<handle>
/// instagram: https://[www.]instagram.com/<id>
/// threads: https://[www.]threads.net/@<handle>
pub fn validate_sns_url(channel_type: SnsChannelType, url: &str) -> bool {
    fn rest_after<'a>(url: &'a str, prefixes: &[&str]) -> Option<&'a str> {
        prefixes
            .iter()
            .find_map(|p| url.strip_prefix(p))
    }

    let rest = match channel_type {
        SnsChannelType::Naver => rest_after(url, &["https://blog.naver.com/"]),
        SnsChannelType::Youtube => rest_after(
            url,
            &["https://www.youtube.com/@", "https://youtube.com/@"],
        ),
        SnsChannelType::Instagram => rest_after(
            url,
            &["https://www.instagram.com/", "https://instagram.com/"],
        ),
        SnsChannelType::Threads => rest_after(
            url,
            &["https://www.threads.net/@", "https://threads.net/@"],
        ),
    };

    matches!(rest, Some(r) if !r.is_empty())
}

/// 비밀번호 정책: 8자 이상, 영문자 + 숫자 + 특수문자(!@#$%^&*) 포함
pub fn validate_password(password: &str) -> Result<(), Vec<&'static str>> {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("비밀번호는 최소 8자 이상이어야 합니다.");
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        errors.push("영문자를 포함해야 합니다.");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("숫자를 포함해야 합니다.");
    }
    if !password.chars().any(|c| "!@#$%^&*".contains(c)) {
        errors.push("특수문자를 포함해야 합니다.");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// 가입이 차단되는 테스트용 이메일 도메인
const INVALID_EMAIL_DOMAINS: [&str; 3] = ["example.com", "test.com", "localhost"];

/// 이메일 형식 + 차단 도메인 검증
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') && domain != "localhost" {
        return false;
    }
    !INVALID_EMAIL_DOMAINS.contains(&domain.to_lowercase().as_str())
}

/// 휴대폰 번호 형식: 010-1234-5678
pub fn validate_phone(phone: &str) -> bool {
    let parts: Vec<&str> = phone.split('-').collect();
    parts.len() == 3
        && parts[0] == "010"
        && parts[1].len() == 4
        && parts[2].len() == 4
        && parts[1].chars().all(|c| c.is_ascii_digit())
        && parts[2].chars().all(|c| c.is_ascii_digit())
}

/// 기준일 시점에 최소 연령 이상인지 확인
pub fn is_at_least_age(birth_date: NaiveDate, min_age: u32, today: NaiveDate) -> bool {
    match birth_date.checked_add_months(chrono::Months::new(min_age * 12)) {
        Some(threshold) => threshold <= today,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_number_valid() {
        // 가중합 알고리즘상 유효한 번호
        assert!(validate_business_number("123-45-67891"));
        assert!(validate_business_number("1234567891"));
    }

    #[test]
    fn test_business_number_single_digit_mutations() {
        // 유효한 번호의 어느 한 자리를 바꿔도 반드시 실패해야 함
        let valid = "1234567891";
        assert!(validate_business_number(valid));

        for pos in 0..10 {
            let original = valid.as_bytes()[pos] - b'0';
            for replacement in 0..10u8 {
                if replacement == original {
                    continue;
                }
                let mut mutated = valid.as_bytes().to_vec();
                mutated[pos] = b'0' + replacement;
                let mutated = String::from_utf8(mutated).unwrap();
                assert!(
                    !validate_business_number(&mutated),
                    "mutation {} should fail",
                    mutated
                );
            }
        }
    }

    #[test]
    fn test_business_number_format_rejection() {
        assert!(!validate_business_number("12345"));
        assert!(!validate_business_number("12345678ab"));
        assert!(!validate_business_number(""));
    }

    #[test]
    fn test_sns_url_patterns() {
        assert!(validate_sns_url(
            SnsChannelType::Naver,
            "https://blog.naver.com/myblog"
        ));
        assert!(validate_sns_url(
            SnsChannelType::Youtube,
            "https://www.youtube.com/@channel"
        ));
        assert!(validate_sns_url(
            SnsChannelType::Instagram,
            "https://instagram.com/user"
        ));
        assert!(validate_sns_url(
            SnsChannelType::Threads,
            "https://threads.net/@user"
        ));

        // 플랫폼 불일치 / 형식 위반
        assert!(!validate_sns_url(
            SnsChannelType::Naver,
            "https://instagram.com/user"
        ));
        assert!(!validate_sns_url(
            SnsChannelType::Youtube,
            "https://www.youtube.com/channel"
        ));
        assert!(!validate_sns_url(SnsChannelType::Instagram, "http://instagram.com/user"));
        assert!(!validate_sns_url(SnsChannelType::Threads, "https://threads.net/@"));
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("abcd123!").is_ok());
        assert!(validate_password("short1!").is_err());
        assert!(validate_password("abcdefgh!").is_err()); // 숫자 없음
        assert!(validate_password("abcd1234").is_err()); // 특수문자 없음
        assert!(validate_password("12345678!").is_err()); // 영문자 없음
    }

    #[test]
    fn test_email_domains() {
        assert!(validate_email("user@gmail.com"));
        assert!(!validate_email("user@example.com"));
        assert!(!validate_email("user@test.com"));
        assert!(!validate_email("user@localhost"));
        assert!(!validate_email("no-at-sign"));
    }

    #[test]
    fn test_phone_format() {
        assert!(validate_phone("010-1234-5678"));
        assert!(!validate_phone("011-1234-5678"));
        assert!(!validate_phone("010-123-5678"));
        assert!(!validate_phone("01012345678"));
    }

    #[test]
    fn test_minimum_age_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        // 정확히 14세가 되는 날
        let exactly_14 = NaiveDate::from_ymd_opt(2010, 6, 15).unwrap();
        assert!(is_at_least_age(exactly_14, 14, today));
        // 하루 모자람
        let one_day_short = NaiveDate::from_ymd_opt(2010, 6, 16).unwrap();
        assert!(!is_at_least_age(one_day_short, 14, today));
    }
}
