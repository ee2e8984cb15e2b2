//! Plugin protocol for extending a namespace.
//!
//! A plugin receives the namespace as `options.base` and registers classes
//! or detection rules on it. It may provide a `namespace` hook, a `load`
//! hook, or neither. When both are provided only `namespace` runs.

use std::fmt;

use crate::namespace::Namespace;

/// Options passed to plugin hooks.
pub struct PluginOptions<'a> {
    pub base: &'a mut Namespace,
}

impl fmt::Debug for PluginOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginOptions").finish_non_exhaustive()
    }
}

/// Whether a plugin provides a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// The hook ran.
    Applied,
    /// The plugin does not provide this hook.
    Missing,
}

/// Trait for namespace plugins.
///
/// Both hooks default to [`Hook::Missing`]; implement the one the plugin
/// provides and return [`Hook::Applied`].
pub trait Plugin {
    fn namespace(&self, _options: &mut PluginOptions<'_>) -> Hook {
        Hook::Missing
    }

    fn load(&self, _options: &mut PluginOptions<'_>) -> Hook {
        Hook::Missing
    }
}

type HookFn = Box<dyn Fn(&mut PluginOptions<'_>) + Send + Sync>;

/// Plugin built from closures.
///
/// ```ignore
/// let plugin = FnPlugin::new().with_load(|options| {
///     options.base.register("title", options.base.get_element_class("string"));
/// });
/// namespace.use_plugin(&plugin);
/// ```
#[derive(Default)]
pub struct FnPlugin {
    namespace: Option<HookFn>,
    load: Option<HookFn>,
}

impl FnPlugin {
    /// Create a plugin without hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_namespace(
        mut self,
        hook: impl Fn(&mut PluginOptions<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.namespace = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_load(
        mut self,
        hook: impl Fn(&mut PluginOptions<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.load = Some(Box::new(hook));
        self
    }
}

impl Plugin for FnPlugin {
    fn namespace(&self, options: &mut PluginOptions<'_>) -> Hook {
        run_hook(self.namespace.as_ref(), options)
    }

    fn load(&self, options: &mut PluginOptions<'_>) -> Hook {
        run_hook(self.load.as_ref(), options)
    }
}

impl fmt::Debug for FnPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPlugin")
            .field("namespace", &self.namespace.is_some())
            .field("load", &self.load.is_some())
            .finish()
    }
}

fn run_hook(hook: Option<&HookFn>, options: &mut PluginOptions<'_>) -> Hook {
    match hook {
        Some(hook) => {
            hook(options);
            Hook::Applied
        }
        None => Hook::Missing,
    }
}

/// Run a plugin against a namespace, preferring its `namespace` hook.
pub(crate) fn apply(plugin: &(impl Plugin + ?Sized), base: &mut Namespace) {
    let mut options = PluginOptions { base };

    if plugin.namespace(&mut options) == Hook::Applied {
        tracing::debug!(hook = "namespace", "Applied plugin");
    } else if plugin.load(&mut options) == Hook::Applied {
        tracing::debug!(hook = "load", "Applied plugin");
    } else {
        tracing::debug!("Plugin provides no hook, ignoring");
    }
}
