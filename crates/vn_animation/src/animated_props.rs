// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wrap a component so some of its props animate on their own.
//!
//! [`with_animated_props`] creates one engine and one animation per animated
//! prop. Rendering the wrapper merges the live animated values with the
//! caller's props, and the caller wins on conflicts.

use crate::animation::{Animation, AnimationEvent, Subscription};
use crate::clock::FrameClock;
use crate::engine::AnimationEngine;
use crate::update_rules::UpdateRule;
use crate::AnimationError;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Props by name
pub type Props<V> = IndexMap<String, V>;

/// How an animated prop evolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Apply the update rule on every frame, forever
    Linear,
}

impl AnimationKind {
    /// Get the tag used in prop specs
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
        }
    }
}

impl FromStr for AnimationKind {
    type Err = AnimationError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "linear" => Ok(Self::Linear),
            other => Err(AnimationError::UnknownKind(other.to_string())),
        }
    }
}

/// Definition of one animated prop
pub struct AnimatedProp<V> {
    /// Animation kind tag, checked when the component is wrapped
    pub kind: String,
    /// Value before the first frame
    pub initial: V,
    /// Per-frame update
    pub update_rule: UpdateRule<V>,
}

impl<V> AnimatedProp<V> {
    /// Create a linear prop
    pub fn linear(initial: V, update_rule: UpdateRule<V>) -> Self {
        Self {
            kind: AnimationKind::Linear.tag().to_string(),
            initial,
            update_rule,
        }
    }

    /// Create a prop with an arbitrary kind tag
    pub fn with_kind(kind: impl Into<String>, initial: V, update_rule: UpdateRule<V>) -> Self {
        Self {
            kind: kind.into(),
            initial,
            update_rule,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for AnimatedProp<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedProp")
            .field("kind", &self.kind)
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

/// Something that turns props into output
pub trait Component<V> {
    /// Rendered output
    type Output;

    /// Name used in the wrapper's display name
    fn name(&self) -> &str {
        "Anonymous"
    }

    /// Render with the given props
    fn render(&self, props: &Props<V>) -> Self::Output;
}

struct AnimatedSlot<V> {
    name: String,
    animation: Animation<V>,
    // Owned so the animation keeps receiving frames for the wrapper's lifetime
    engine: AnimationEngine,
}

/// A component whose animated props are supplied automatically
pub struct WithAnimatedProps<C, V> {
    component: C,
    display_name: String,
    slots: Vec<AnimatedSlot<V>>,
}

/// Wrap `component` so the props in `animated` are driven by animations on
/// `clock`.
///
/// Fails if any prop names an animation kind that does not exist.
pub fn with_animated_props<C, V>(
    animated: impl IntoIterator<Item = (String, AnimatedProp<V>)>,
    component: C,
    clock: Arc<dyn FrameClock>,
) -> Result<WithAnimatedProps<C, V>, AnimationError>
where
    C: Component<V>,
    V: Clone + Send + Sync + 'static,
{
    let props = animated.into_iter()
        .map(|(name, prop)| {
            let kind: AnimationKind = prop.kind.parse()?;
            Ok((name, kind, prop))
        })
        .collect::<Result<Vec<_>, AnimationError>>()?;

    let slots = props.into_iter()
        .map(|(name, kind, prop)| {
            let engine = AnimationEngine::new(Arc::clone(&clock));
            let animation = match kind {
                AnimationKind::Linear => {
                    let rule = prop.update_rule;
                    engine.create(prop.initial, move |state, delta| Some(rule(state, delta)))
                }
            };
            animation.start();
            AnimatedSlot { name, animation, engine }
        })
        .collect::<Vec<_>>();

    let display_name = format!("withAnimatedProps({})", component.name());
    tracing::debug!(component = %display_name, props = slots.len(), "Wrapped component");

    Ok(WithAnimatedProps {
        component,
        display_name,
        slots,
    })
}

impl<C, V> WithAnimatedProps<C, V>
where
    C: Component<V>,
    V: Clone + Send + Sync + 'static,
{
    /// Name of the wrapper
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Names of the animated props
    pub fn animated_props(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    /// Current animated values
    pub fn values(&self) -> Props<V> {
        self.slots.iter()
            .filter_map(|slot| slot.animation.state().map(|v| (slot.name.clone(), v)))
            .collect()
    }

    /// Render the wrapped component. Values in `props` override animated
    /// values of the same name.
    pub fn render(&self, props: &Props<V>) -> C::Output {
        let mut merged = self.values();
        merged.extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.component.render(&merged)
    }

    /// Run `on_update` whenever any animated prop changes
    pub fn on_update(&self, on_update: impl Fn() + Send + Sync + 'static) -> Subscription {
        let on_update = Arc::new(on_update);
        let subscriptions = self.slots.iter()
            .map(|slot| {
                let on_update = Arc::clone(&on_update);
                slot.animation.listen(move |event| {
                    if matches!(event, AnimationEvent::Update(_)) {
                        on_update();
                    }
                })
            })
            .collect();
        Subscription::all(subscriptions)
    }

    /// Stop every prop's engine
    pub fn destroy(&self) {
        for slot in &self.slots {
            slot.engine.destroy();
        }
    }

    /// The wrapped component
    pub fn inner(&self) -> &C {
        &self.component
    }
}
