use canonical_email::{MailboxProvider, ProviderRegistry, canonicalize, find_provider_by_domain};
use proptest::prelude::*;

fn providers() -> Vec<Option<MailboxProvider>> {
    let mut out: Vec<Option<MailboxProvider>> = ProviderRegistry::builtin()
        .providers()
        .iter()
        .copied()
        .map(Some)
        .collect();
    out.push(None);
    out
}

fn address() -> impl Strategy<Value = String> {
    ("[A-Za-z0-9.+_-]{1,24}", "[A-Za-z0-9-]{1,12}(\\.[A-Za-z]{2,6}){1,2}")
        .prop_map(|(local, domain)| format!("{local}@{domain}"))
}

fn flip_case(s: &str, mask: &[bool]) -> String {
    s.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(addr in address(), idx in 0usize..13) {
        let all = providers();
        let provider = all[idx % all.len()].as_ref();
        let once = canonicalize(&addr, provider);
        let twice = canonicalize(&once, provider);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn canonicalize_ignores_case(
        addr in address(),
        mask in proptest::collection::vec(any::<bool>(), 1..8),
        idx in 0usize..13,
    ) {
        let all = providers();
        let provider = all[idx % all.len()].as_ref();
        let flipped = flip_case(&addr, &mask);
        prop_assert_eq!(canonicalize(&addr, provider), canonicalize(&flipped, provider));
    }

    #[test]
    fn plus_tags_collapse_for_google(
        user in "[a-z0-9]{1,12}",
        tag in "[a-z0-9.]{0,12}",
    ) {
        let google = find_provider_by_domain("gmail-smtp-in.l.google.com.");
        let tagged = format!("{user}+{tag}@gmail.com");
        prop_assert_eq!(canonicalize(&tagged, google), format!("{user}@gmail.com"));
    }

    #[test]
    fn suffix_match_needs_label_boundary(prefix in "[a-z0-9]{1,10}") {
        let glued = format!("{prefix}google.com.");
        let labelled = format!("{prefix}.google.com.");
        prop_assert!(find_provider_by_domain(&glued).is_none());
        prop_assert_eq!(find_provider_by_domain(&labelled).map(|p| p.name), Some("Google"));
    }
}

#[test]
fn concrete_cases() {
    let google = find_provider_by_domain("google.com.");
    let yahoo = find_provider_by_domain("mta6.am0.yahoodns.net.");
    let apple = find_provider_by_domain("mx01.mail.icloud.com.");

    assert_eq!(canonicalize("user+tag@gmail.com", google), "user@gmail.com");
    assert_eq!(canonicalize("us.er@gmail.com", google), "user@gmail.com");
    assert_eq!(canonicalize("user-tag@yahoo.com", yahoo), "user@yahoo.com");
    assert_eq!(
        canonicalize("mailbox.sub@icloud.com", apple),
        "mailbox.sub@icloud.com"
    );
    assert_eq!(
        canonicalize("User.Name+X@unknown.example", None),
        "user.name+x@unknown.example"
    );
}
