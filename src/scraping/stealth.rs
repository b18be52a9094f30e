//! Basic fingerprint masking, registered before any navigation so it runs
//! ahead of the site's own scripts on every document.

use tracing::{info, warn};

use super::page::BrowsingPage;

const FINGERPRINT_MASK_SCRIPT: &str = r#"
// navigator hardening
(() => {
    try {
        const proto = Navigator.prototype;
        try {
            Object.defineProperty(proto, 'webdriver', {
                get: () => undefined,
                configurable: true,
            });
        } catch (e) {}
        try { delete navigator.webdriver; } catch (e) {}
        try {
            Object.defineProperty(proto, 'languages', {
                get: () => ['en-US', 'en'],
                configurable: true,
            });
        } catch (e) {}
        try {
            Object.defineProperty(proto, 'plugins', {
                get: () => [1, 2, 3, 4, 5],
                configurable: true,
            });
        } catch (e) {}
    } catch (e) {}
})();

// chrome runtime presence
if (!window.chrome) {
    window.chrome = {};
}
if (!window.chrome.runtime) {
    window.chrome.runtime = {
        connect: function() { return { onDisconnect: { addListener: function() {} } }; },
        sendMessage: function() {},
    };
}

// notification permission query
const originalQuery = window.navigator.permissions && window.navigator.permissions.query;
if (originalQuery) {
    window.navigator.permissions.query = (parameters) => (
        parameters.name === 'notifications'
            ? Promise.resolve({ state: Notification.permission })
            : originalQuery(parameters)
    );
}

// automation globals
delete window.__playwright;
delete window.__puppeteer;
delete window.__selenium;
delete window.callPhantom;
delete window._phantom;
"#;

pub fn fingerprint_mask_script() -> &'static str {
    FINGERPRINT_MASK_SCRIPT
}

/// Register the masking script. Failure is logged and ignored: the session
/// still works without it, only less quietly.
pub async fn install<P: BrowsingPage + ?Sized>(page: &P) -> bool {
    match page.add_init_script(FINGERPRINT_MASK_SCRIPT).await {
        Ok(()) => {
            info!("💉 fingerprint masking installed");
            true
        }
        Err(e) => {
            warn!("fingerprint masking not installed: {}", e);
            false
        }
    }
}
