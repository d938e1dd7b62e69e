use crate::threadrand::SecureRng;

/// Catalog variants a campaign can draw from in RANDOM mode. `GenericNotice`
/// is deliberately absent: it is only the fallback for unrecognized ids.
pub const DRAWABLE_TEMPLATES: [LureTemplate; 6] = [
    LureTemplate::SecurityAlert,
    LureTemplate::FinanceInvoice,
    LureTemplate::HrPolicy,
    LureTemplate::ItPasswordReset,
    LureTemplate::BenefitsReward,
    LureTemplate::LogisticsDelivery,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LureTemplate {
    SecurityAlert,
    FinanceInvoice,
    HrPolicy,
    ItPasswordReset,
    BenefitsReward,
    LogisticsDelivery,
    GenericNotice,
}

pub struct LureVars<'a> {
    pub target_name: &'a str,
    pub company_name: &'a str,
    pub link: &'a str,
}

pub struct RenderedLure {
    pub subject: String,
    pub html: String,
}

struct LureCopy {
    subject: String,
    banner_color: &'static str,
    heading: &'static str,
    body: &'static str,
    cta_label: &'static str,
}

impl LureTemplate {
    pub fn id(self) -> &'static str {
        match self {
            LureTemplate::SecurityAlert => "SECURITY_ALERT",
            LureTemplate::FinanceInvoice => "FINANCE_INVOICE",
            LureTemplate::HrPolicy => "HR_POLICY",
            LureTemplate::ItPasswordReset => "IT_PASSWORD_RESET",
            LureTemplate::BenefitsReward => "BENEFITS_REWARD",
            LureTemplate::LogisticsDelivery => "LOGISTICS_DELIVERY",
            LureTemplate::GenericNotice => "GENERIC_NOTICE",
        }
    }

    /// Unrecognized ids resolve to the generic notice rather than failing;
    /// a stored default must never be able to break a launch.
    pub fn from_id(id: &str) -> LureTemplate {
        match id {
            "SECURITY_ALERT" => LureTemplate::SecurityAlert,
            "FINANCE_INVOICE" => LureTemplate::FinanceInvoice,
            "HR_POLICY" => LureTemplate::HrPolicy,
            "IT_PASSWORD_RESET" => LureTemplate::ItPasswordReset,
            "BENEFITS_REWARD" => LureTemplate::BenefitsReward,
            "LOGISTICS_DELIVERY" => LureTemplate::LogisticsDelivery,
            _ => LureTemplate::GenericNotice,
        }
    }

    /// One uniform draw from the drawable catalog. Called once per campaign,
    /// never once per target.
    pub fn draw() -> LureTemplate {
        DRAWABLE_TEMPLATES[SecureRng::uniform_index(DRAWABLE_TEMPLATES.len())]
    }

    pub fn render(self, vars: &LureVars) -> RenderedLure {
        let copy = self.copy(vars.company_name);

        let html = layout_shell(
            vars.company_name,
            copy.banner_color,
            copy.heading,
            vars.target_name,
            copy.body,
            copy.cta_label,
            vars.link,
        );

        RenderedLure {
            subject: copy.subject,
            html,
        }
    }

    fn copy(self, company_name: &str) -> LureCopy {
        match self {
            LureTemplate::SecurityAlert => LureCopy {
                subject: format!(
                    "[Action Required] Unusual sign-in activity at {company_name}"
                ),
                banner_color: "#dc2626",
                heading: "Security Alert",
                body: "A sign-in from an unrecognized location has been detected. If this \
                       was not you, you must secure your account immediately to avoid \
                       access being locked.",
                cta_label: "Review Recent Activity",
            },
            LureTemplate::FinanceInvoice => LureCopy {
                subject: format!(
                    "Electronic Invoice #{} Pending - {company_name}",
                    reference_number()
                ),
                banner_color: "#16a34a",
                heading: "New Invoice Available",
                body: "A new invoice has been issued for this month's services. Payment is \
                       due within 24 hours to avoid administrative surcharges.",
                cta_label: "Download Invoice (PDF)",
            },
            LureTemplate::HrPolicy => LureCopy {
                subject: format!("IMPORTANT: Policy Update at {company_name}"),
                banner_color: "#7c3aed",
                heading: "Internal Memo",
                body: "The remote-work and leave policies have been updated for the coming \
                       year. All employees are required to confirm receipt of this \
                       document.",
                cta_label: "Sign Document",
            },
            LureTemplate::ItPasswordReset => LureCopy {
                subject: format!(
                    "[IT SUPPORT] Mandatory password change for {company_name}"
                ),
                banner_color: "#475569",
                heading: "Action Required: IT Security",
                body: "Our security policy requires you to update your password every 90 \
                       days. Your current session will expire in 2 hours unless your \
                       credentials are validated.",
                cta_label: "Validate My Account Now",
            },
            LureTemplate::BenefitsReward => LureCopy {
                subject: format!(
                    "Congratulations! You have received a Reward Bonus - {company_name}"
                ),
                banner_color: "#f59e0b",
                heading: "Employee Recognition",
                body: "Thanks to your excellent performance this quarter, an electronic \
                       gift card has been assigned to you. Click below to redeem your code \
                       and see the benefit details.",
                cta_label: "Redeem My Bonus",
            },
            LureTemplate::LogisticsDelivery => LureCopy {
                subject: format!(
                    "Delivery attempt failed - shipment #{} - {company_name}",
                    reference_number()
                ),
                banner_color: "#0891b2",
                heading: "Package On Hold",
                body: "A parcel addressed to you could not be delivered and is being held \
                       at the distribution center. Schedule redelivery within 48 hours or \
                       the shipment will be returned to the sender.",
                cta_label: "Schedule Redelivery",
            },
            LureTemplate::GenericNotice => LureCopy {
                subject: format!("System Notification - {company_name}"),
                banner_color: "#2563eb",
                heading: "Pending Notice",
                body: "You have an important message in your corporate inbox that requires \
                       your immediate attention.",
                cta_label: "Access the Portal",
            },
        }
    }
}

fn reference_number() -> u32 {
    100_000 + SecureRng::next_u32() % 900_000
}

/// One shared shell for every variant: banner, body panel with greeting and
/// CTA button, footer disclaimer.
#[allow(clippy::too_many_arguments)]
fn layout_shell(
    company_name: &str,
    banner_color: &str,
    heading: &str,
    target_name: &str,
    body: &str,
    cta_label: &str,
    link: &str,
) -> String {
    format!(
        "<div style=\"font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; \
         background-color: #f4f4f7; padding: 20px; color: #333;\">\
           <table align=\"center\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" width=\"600\" \
            style=\"background-color: #ffffff; border-radius: 12px; overflow: hidden; \
            box-shadow: 0 4px 15px rgba(0,0,0,0.08);\">\
             <tr>\
               <td style=\"background-color: {banner_color}; padding: 30px; text-align: center; \
                color: #ffffff;\">\
                 <h1 style=\"margin: 0; font-size: 22px; text-transform: uppercase; \
                  letter-spacing: 3px; font-weight: 900;\">{company_name}</h1>\
               </td>\
             </tr>\
             <tr>\
               <td style=\"padding: 40px 30px;\">\
                 <h2 style=\"color: #111827; margin-top: 0; font-size: 20px;\">{heading}</h2>\
                 <p style=\"font-size: 16px; line-height: 1.6; color: #4b5563;\">Hello \
                  <strong>{target_name}</strong>,</p>\
                 <p style=\"font-size: 16px; line-height: 1.6; color: #4b5563;\">{body}</p>\
                 <div style=\"text-align: center; margin-top: 40px;\">\
                   <a href=\"{link}\" style=\"background-color: {banner_color}; color: #ffffff; \
                    padding: 16px 32px; border-radius: 8px; text-decoration: none; \
                    font-weight: bold; font-size: 15px; display: inline-block;\">{cta_label}</a>\
                 </div>\
               </td>\
             </tr>\
             <tr>\
               <td style=\"background-color: #f9fafb; padding: 25px; text-align: center; \
                font-size: 12px; color: #9ca3af; border-top: 1px solid #e5e7eb;\">\
                 This is an automated message generated by {company_name} systems.<br>\
                 Please do not reply to this sender. &copy; {company_name} Corp.\
               </td>\
             </tr>\
           </table>\
         </div>"
    )
}

pub struct DeliveryReceiptNotice {}
pub struct ClickAlertNotice {}

impl DeliveryReceiptNotice {
    /// Operator receipt sent to the resolved sender address after each
    /// successful target send.
    pub fn generate(target_name: &str, target_email: &str, template_id: &str) -> String {
        format!(
            "<p>The system has processed the send to <strong>{target_email}</strong> \
             ({target_name}) using the <strong>{template_id}</strong> template.</p>"
        )
    }
}

impl ClickAlertNotice {
    /// Sent to the campaign owner when a target follows their tracking link
    /// for the first time.
    pub fn generate(target_name: &str, target_email: &str) -> String {
        format!(
            "<div style=\"font-family:sans-serif; background:#0f1115; color:#fff; \
             padding:40px; border-radius:20px;\">\
               <h1 style=\"color:#10b981;\">Interaction Recorded</h1>\
               <p>Target <strong>{target_name}</strong> ({target_email}) just followed \
               their tracking link.</p>\
               <p>Check the dashboard for details.</p>\
               <hr style=\"border:none; border-top:1px solid #333; margin:20px 0;\">\
               <small style=\"color:#666;\">Lurewatch awareness system</small>\
             </div>"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_every_drawable_id_round_trips() {
        for template in DRAWABLE_TEMPLATES {
            assert_eq!(LureTemplate::from_id(template.id()), template);
        }
        assert_eq!(
            LureTemplate::from_id(LureTemplate::GenericNotice.id()),
            LureTemplate::GenericNotice
        );
    }

    #[test]
    fn test_unknown_id_falls_back_to_generic() {
        assert_eq!(LureTemplate::from_id("RANDOM"), LureTemplate::GenericNotice);
        assert_eq!(LureTemplate::from_id(""), LureTemplate::GenericNotice);
        assert_eq!(
            LureTemplate::from_id("security_alert"),
            LureTemplate::GenericNotice
        );
    }

    #[test]
    fn test_generic_is_not_drawable() {
        assert!(!DRAWABLE_TEMPLATES.contains(&LureTemplate::GenericNotice));
    }

    #[test]
    fn test_draw_is_roughly_uniform() {
        const DRAWS: usize = 6_000;

        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        for _ in 0..DRAWS {
            *counts.entry(LureTemplate::draw().id()).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), DRAWABLE_TEMPLATES.len());

        // Expected 1000 per variant; +/- 250 is well past 8 sigma
        let expected = DRAWS / DRAWABLE_TEMPLATES.len();
        for (id, count) in counts {
            assert!(
                count > expected - 250 && count < expected + 250,
                "template {id} drawn {count} times out of {DRAWS}"
            );
        }
    }

    #[test]
    fn test_render_substitutes_variables() {
        let rendered = LureTemplate::SecurityAlert.render(&LureVars {
            target_name: "Bob",
            company_name: "Initech",
            link: "https://lure.example.com/l/abc",
        });

        assert_eq!(
            rendered.subject,
            "[Action Required] Unusual sign-in activity at Initech"
        );
        assert!(rendered.html.contains("<strong>Bob</strong>"));
        assert!(rendered.html.contains("Initech"));
        assert!(rendered
            .html
            .contains("href=\"https://lure.example.com/l/abc\""));
        assert!(rendered.html.contains("#dc2626"));
        assert!(rendered.html.contains("Review Recent Activity"));
    }

    #[test]
    fn test_invoice_subject_embeds_reference_number() {
        let rendered = LureTemplate::FinanceInvoice.render(&LureVars {
            target_name: "Bob",
            company_name: "Initech",
            link: "https://lure.example.com/l/abc",
        });

        let digits: String = rendered
            .subject
            .chars()
            .skip_while(|c| *c != '#')
            .skip(1)
            .take_while(char::is_ascii_digit)
            .collect();

        assert_eq!(digits.len(), 6, "subject was: {}", rendered.subject);
    }

    #[test]
    fn test_every_variant_renders_through_shared_shell() {
        let all = [
            LureTemplate::SecurityAlert,
            LureTemplate::FinanceInvoice,
            LureTemplate::HrPolicy,
            LureTemplate::ItPasswordReset,
            LureTemplate::BenefitsReward,
            LureTemplate::LogisticsDelivery,
            LureTemplate::GenericNotice,
        ];

        for template in all {
            let rendered = template.render(&LureVars {
                target_name: "Alice",
                company_name: "Globex",
                link: "https://lure.example.com/l/xyz",
            });

            assert!(rendered.subject.contains("Globex"));
            assert!(rendered.html.contains("<strong>Alice</strong>"));
            assert!(rendered.html.contains("automated message"));
        }
    }

    #[test]
    fn test_notices() {
        let receipt = DeliveryReceiptNotice::generate("Bob", "bob@y.com", "SECURITY_ALERT");
        assert!(receipt.contains("bob@y.com"));
        assert!(receipt.contains("SECURITY_ALERT"));

        let alert = ClickAlertNotice::generate("Bob", "bob@y.com");
        assert!(alert.contains("Bob"));
        assert!(alert.contains("bob@y.com"));
    }
}
