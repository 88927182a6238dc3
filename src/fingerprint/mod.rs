//! Fingerprint normalization for automated browsing contexts.
//!
//! Installs a one-shot init script that overrides a fixed set of
//! automation-revealing browser properties and intercepts the permission
//! query and canvas export surfaces. The overrides are best-effort
//! hardening: every redefinition is wrapped so that a property the browser
//! refuses to redefine fails silently, and nothing downstream depends on
//! the shim having taken effect.
//!
//! The canvas interception perturbs a bounded pixel region with a seeded
//! linear congruential generator, so two contexts sharing a seed render
//! identical perturbations for an identical draw sequence.

use serde_json::json;
use tracing::{debug, instrument};

use crate::browser::{BrowserError, BrowsingContext};

/// Explicit override values for one browsing context.
///
/// A configuration value rather than process-wide constants, so tests and
/// callers can pin the canvas seed per run.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintProfile {
    /// Reported `navigator.hardwareConcurrency`.
    pub hardware_concurrency: u32,
    /// Reported `navigator.language`.
    pub language: String,
    /// Reported `navigator.languages`.
    pub languages: Vec<String>,
    /// Reported `navigator.platform`.
    pub platform: String,
    /// Seed for the canvas export perturbation.
    pub canvas_seed: u32,
    /// Value returned for the unmasked WebGL renderer parameter (0x9245).
    pub webgl_renderer: String,
    /// Value returned for the unmasked WebGL vendor parameter (0x9246).
    pub webgl_vendor: String,
}

impl Default for FingerprintProfile {
    fn default() -> Self {
        Self {
            hardware_concurrency: 8,
            language: "en-GB".to_string(),
            languages: vec!["en-GB".to_string(), "en".to_string()],
            platform: "MacIntel".to_string(),
            canvas_seed: 1337,
            webgl_renderer: "ANGLE (Intel, Intel(R) Iris(TM) Graphics, OpenGL 4.1)".to_string(),
            webgl_vendor: "Google Inc.".to_string(),
        }
    }
}

impl FingerprintProfile {
    /// Returns a profile with a pinned canvas seed.
    #[must_use]
    pub fn with_canvas_seed(self, canvas_seed: u32) -> Self {
        Self {
            canvas_seed,
            ..self
        }
    }

    /// Renders the init script for this profile. Deterministic: equal
    /// profiles render byte-identical scripts.
    #[must_use]
    pub fn init_script(&self) -> String {
        // json! gives correct escaping for anything callers put in the
        // override strings.
        let overrides = json!({
            "hardwareConcurrency": self.hardware_concurrency,
            "language": self.language,
            "languages": self.languages,
            "platform": self.platform,
            "canvasSeed": self.canvas_seed,
            "webglRenderer": self.webgl_renderer,
            "webglVendor": self.webgl_vendor,
        });
        format!("(() => {{\nconst OVERRIDES = {overrides};\n{SHIM_BODY}}})();\n")
    }

    /// Installs the shim on `ctx`. Must run before any page is created in
    /// the context so the first navigation is already covered.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError`] only when script installation itself fails;
    /// individual overrides inside the script never raise.
    #[instrument(level = "debug", skip(self, ctx))]
    pub async fn apply_to(&self, ctx: &dyn BrowsingContext) -> Result<(), BrowserError> {
        ctx.add_init_script(&self.init_script()).await?;
        debug!(seed = self.canvas_seed, "fingerprint shim installed");
        Ok(())
    }
}

/// Body of the shim; reads its values from the `OVERRIDES` object the
/// profile renders above it.
const SHIM_BODY: &str = r#"
const defineGetter = (obj, prop, value) => {
  try {
    Object.defineProperty(obj, prop, { get: () => value, configurable: true });
  } catch {}
};

defineGetter(Navigator.prototype, "hardwareConcurrency", OVERRIDES.hardwareConcurrency);
defineGetter(Navigator.prototype, "language", OVERRIDES.language);
defineGetter(Navigator.prototype, "languages", OVERRIDES.languages);
defineGetter(Navigator.prototype, "platform", OVERRIDES.platform);
defineGetter(Navigator.prototype, "webdriver", undefined);

if (navigator.permissions && navigator.permissions.query) {
  const originalQuery = navigator.permissions.query.bind(navigator.permissions);
  navigator.permissions.query = (parameters) => {
    try {
      if (parameters && parameters.name === "notifications") {
        return Promise.resolve({ state: Notification.permission, onchange: null });
      }
    } catch {}
    return originalQuery(parameters);
  };
}

let s = OVERRIDES.canvasSeed >>> 0;
const rand = () => (s = (s * 1664525 + 1013904223) >>> 0) / 2**32;

const patchCanvasExport = (name) => {
  const orig = HTMLCanvasElement.prototype[name];
  if (!orig) return;

  Object.defineProperty(HTMLCanvasElement.prototype, name, {
    value: function(...args) {
      try {
        const ctx = this.getContext("2d");
        if (ctx) {
          const w = this.width | 0, h = this.height | 0;
          if (w > 0 && h > 0) {
            const x = (rand() * Math.min(8, w)) | 0;
            const y = (rand() * Math.min(8, h)) | 0;
            const img = ctx.getImageData(x, y, 1, 1);
            img.data[0] = (img.data[0] + 1) & 255;
            ctx.putImageData(img, x, y);
          }
        }
      } catch {
        // tainted canvas / security errors
      }
      return orig.apply(this, args);
    },
    configurable: true
  });
};

patchCanvasExport("toDataURL");
patchCanvasExport("toBlob");

const patchWebGL = (proto) => {
  if (!proto || !proto.getParameter) return;
  const origGetParameter = proto.getParameter;

  Object.defineProperty(proto, "getParameter", {
    value: function(parameter) {
      if (parameter === 37445) return OVERRIDES.webglRenderer;
      if (parameter === 37446) return OVERRIDES.webglVendor;
      return origGetParameter.call(this, parameter);
    },
    configurable: true
  });
};

patchWebGL(window.WebGLRenderingContext && WebGLRenderingContext.prototype);
patchWebGL(window.WebGL2RenderingContext && WebGL2RenderingContext.prototype);
"#;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_renders_identical_script() {
        let a = FingerprintProfile::default().with_canvas_seed(42);
        let b = FingerprintProfile::default().with_canvas_seed(42);
        assert_eq!(a.init_script(), b.init_script());
    }

    #[test]
    fn test_different_seeds_render_different_scripts() {
        let a = FingerprintProfile::default().with_canvas_seed(1);
        let b = FingerprintProfile::default().with_canvas_seed(2);
        assert_ne!(a.init_script(), b.init_script());
    }

    #[test]
    fn test_script_embeds_all_override_values() {
        let script = FingerprintProfile::default().init_script();
        assert!(script.contains("\"hardwareConcurrency\":8"), "{script}");
        assert!(script.contains("en-GB"), "{script}");
        assert!(script.contains("MacIntel"), "{script}");
        assert!(script.contains("\"canvasSeed\":1337"), "{script}");
        assert!(script.contains("Google Inc."), "{script}");
    }

    #[test]
    fn test_script_escapes_hostile_override_strings() {
        let profile = FingerprintProfile {
            platform: "Mac\"Intel\\".to_string(),
            ..FingerprintProfile::default()
        };
        let script = profile.init_script();
        assert!(script.contains(r#""Mac\"Intel\\""#), "{script}");
    }

    #[test]
    fn test_script_covers_every_intercepted_surface() {
        let script = FingerprintProfile::default().init_script();
        assert!(script.contains("webdriver"));
        assert!(script.contains("permissions.query"));
        assert!(script.contains("toDataURL"));
        assert!(script.contains("toBlob"));
        assert!(script.contains("37445"));
        assert!(script.contains("37446"));
    }
}
