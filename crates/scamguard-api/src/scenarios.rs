//! Canned practice scenarios served to the scam simulator, plus the sample
//! message the check page offers as a demo. Static content; the catalog is
//! rebuilt per request because the response is tiny.

use scamguard_types::api::{RedFlag, Scenario};

pub const SAMPLE_SCAM_TEXT: &str = "Hi Grandma, it's me, your grandson Michael. I'm in trouble and \
     I need your help. I was in a car accident and I got arrested. Please don't tell Mom and Dad \
     \u{2014} I'm so embarrassed. My lawyer says I need $2,000 for bail posted today or I'll have \
     to stay in jail over the weekend. Can you send it through Zelle to my lawyer's account? His \
     number is 555-0199. Please hurry, I'm really scared.";

fn flag(text: &str, label: &str) -> RedFlag {
    RedFlag {
        text: text.to_string(),
        label: label.to_string(),
    }
}

pub fn catalog() -> Vec<Scenario> {
    vec![
        Scenario {
            id: 1,
            kind: "Text Message".to_string(),
            icon: "\u{1F4AC}".to_string(),
            difficulty: "Beginner".to_string(),
            from: "+1 (833) 555-0147".to_string(),
            message: "ALERT: Your EZPass account has an unpaid toll of $4.75. Your driving \
                 privileges will be suspended if not paid within 24hrs. Pay now: \
                 ez-pass-payment.securetolls.net/verify"
                .to_string(),
            red_flags: vec![
                flag(
                    "ez-pass-payment.securetolls.net",
                    "Fake domain \u{2014} real EZPass uses ezpassnh.com or state-specific sites",
                ),
                flag(
                    "suspended within 24hrs",
                    "Urgency tactic \u{2014} creates panic to prevent you from thinking clearly",
                ),
                flag(
                    "$4.75",
                    "Small amount \u{2014} designed to seem not worth questioning",
                ),
            ],
            is_scam: true,
            explanation: "This is a classic toll road phishing scam that surged 900% in 2025. \
                 Real toll agencies send physical mail for unpaid tolls \u{2014} they never text \
                 you a payment link."
                .to_string(),
            tip: "Always go directly to the official toll website by typing it into your \
                 browser. Never click links in texts about unpaid tolls."
                .to_string(),
        },
        Scenario {
            id: 2,
            kind: "Phone Call".to_string(),
            icon: "\u{1F4DE}".to_string(),
            difficulty: "Intermediate".to_string(),
            from: "Caller ID: 'Social Security Admin'".to_string(),
            message: "\"Hello, this is Officer James Mitchell, badge number 4471, from the \
                 Social Security Administration. We've detected fraudulent activity on your \
                 Social Security number. Your SSN has been linked to criminal activity in Texas \
                 and your benefits will be frozen immediately unless you verify your identity. I \
                 need your full Social Security number and date of birth to prevent the \
                 suspension. This is time-sensitive \u{2014} if you hang up, a warrant will be \
                 issued for your arrest.\""
                .to_string(),
            red_flags: vec![
                flag(
                    "badge number 4471",
                    "Fake authority \u{2014} SSA employees don't have 'badge numbers'",
                ),
                flag(
                    "your benefits will be frozen immediately",
                    "Threat tactic \u{2014} SSA never threatens to freeze benefits over the phone",
                ),
                flag(
                    "I need your full Social Security number",
                    "Data harvesting \u{2014} SSA already has your SSN and would never ask for it",
                ),
                flag(
                    "a warrant will be issued for your arrest",
                    "Intimidation \u{2014} law enforcement doesn't call to warn about arrest warrants",
                ),
            ],
            is_scam: true,
            explanation: "This is a government impersonation scam, one of the costliest fraud \
                 types with median losses over $14,000. The SSA will never call threatening \
                 arrest, ask for your full SSN, or demand immediate action."
                .to_string(),
            tip: "Hang up immediately. If you're worried, call the SSA directly at \
                 1-800-772-1213 (their real number, which you can verify on ssa.gov)."
                .to_string(),
        },
        Scenario {
            id: 3,
            kind: "Email".to_string(),
            icon: "\u{2709}\u{FE0F}".to_string(),
            difficulty: "Advanced".to_string(),
            from: "careers@amaz0n-recruiting.com".to_string(),
            message: "Subject: Remote Position \u{2014} Customer Experience Coordinator \
                 ($42/hr)\n\nHi! Based on your LinkedIn profile, we'd love to offer you a remote \
                 Customer Experience Coordinator position at Amazon. The role pays $42/hour, \
                 fully remote, flexible schedule.\n\nTo get started, please complete our \
                 onboarding form which requires your banking details for direct deposit setup, \
                 and a $75 equipment fee for your home office starter kit (laptop + headset), \
                 which will be reimbursed on your first paycheck.\n\nPlease complete onboarding \
                 within 48 hours to secure your spot."
                .to_string(),
            red_flags: vec![
                flag(
                    "amaz0n-recruiting.com",
                    "Spoofed domain \u{2014} uses '0' instead of 'o'. Real Amazon emails come \
                     from @amazon.com",
                ),
                flag(
                    "$42/hour, fully remote, flexible schedule",
                    "Too good to be true \u{2014} unrealistic compensation for an entry-level role",
                ),
                flag(
                    "$75 equipment fee",
                    "Upfront payment \u{2014} legitimate employers never charge you to start working",
                ),
                flag(
                    "within 48 hours to secure your spot",
                    "Artificial urgency \u{2014} pressure to act before you can research the offer",
                ),
            ],
            is_scam: true,
            explanation: "Employment scams surged dramatically in 2025 as layoffs increased. \
                 Scammers impersonate real companies on LinkedIn and job boards. They steal your \
                 banking info through fake 'onboarding' and collect upfront fees that are never \
                 reimbursed."
                .to_string(),
            tip: "Visit the company's official careers page directly. Real companies never \
                 charge equipment fees, and the hiring process always involves actual interviews."
                .to_string(),
        },
    ]
}
