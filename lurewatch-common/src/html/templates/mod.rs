pub struct LureLandingPage {}

impl LureLandingPage {
    /// Served for every tracking-link visit, whether or not the id matched a
    /// delivery. Varying the page by lookup result would leak which ids
    /// exist.
    pub fn generate() -> &'static str {
        "<!DOCTYPE html>
         <html>
           <head>
             <title>Security Awareness Notice</title>
             <style>
               body {
                 font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
                 background-color: #0a0b0d;
                 color: #ffffff;
                 display: flex;
                 align-items: center;
                 justify-content: center;
                 min-height: 100vh;
                 margin: 0;
               }
               .panel {
                 max-width: 560px;
                 background-color: #16181d;
                 border: 2px solid rgba(239, 68, 68, 0.3);
                 border-radius: 24px;
                 padding: 48px;
                 text-align: center;
               }
               .badge {
                 display: inline-block;
                 background-color: #ef4444;
                 color: #000000;
                 font-size: 11px;
                 font-weight: 900;
                 text-transform: uppercase;
                 letter-spacing: 0.3em;
                 padding: 8px 16px;
                 border-radius: 999px;
                 margin-bottom: 32px;
               }
               .hint {
                 background-color: rgba(255, 255, 255, 0.05);
                 border-radius: 16px;
                 padding: 16px;
                 margin-top: 16px;
                 font-size: 14px;
                 color: rgba(255, 255, 255, 0.7);
                 text-align: left;
               }
               .footer {
                 margin-top: 40px;
                 padding-top: 24px;
                 border-top: 1px solid rgba(255, 255, 255, 0.05);
                 font-size: 10px;
                 text-transform: uppercase;
                 letter-spacing: 0.2em;
                 color: rgba(255, 255, 255, 0.2);
               }
             </style>
           </head>
           <body>
             <div class=\"panel\">
               <h1>You took the bait!</h1>
               <div class=\"badge\">Simulated attack in progress</div>
               <div class=\"hint\">If this had been a real attack, your passwords and \
               banking details could have been compromised just now.</div>
               <div class=\"hint\">Never click links in emails that rush you or demand \
               urgent action without verifying the source.</div>
               <p class=\"footer\">Awareness campaign by Lurewatch Security</p>
             </div>
           </body>
         </html>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_page_is_static_html() {
        let page = LureLandingPage::generate();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("Simulated attack"));
    }
}
