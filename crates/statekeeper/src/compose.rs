//! Right-to-left function composition
//!
//! `compose([f, g, h])` behaves like `|x| f(g(h(x)))`. It is how middleware
//! links and enhancers are chained, and it is useful on its own.
//!
//! The [`compose!`](crate::compose!) macro does the same for closures of
//! different types. Its rightmost function may take a tuple, which gives the
//! composed function the argument list of the innermost one.

/// A boxed single-argument function that [`compose`] can chain
pub type Composable<'a, T> = Box<dyn Fn(T) -> T + 'a>;

/// Compose functions from right to left.
///
/// No functions yields the identity. A single function is returned as is.
pub fn compose<'a, T: 'a>(funcs: impl IntoIterator<Item = Composable<'a, T>>) -> Composable<'a, T> {
    let mut funcs = funcs.into_iter();
    let Some(first) = funcs.next() else {
        return Box::new(|arg| arg);
    };
    funcs.fold(first, |outer, inner| -> Composable<'a, T> {
        Box::new(move |arg| outer(inner(arg)))
    })
}

/// Compose closures of any types from right to left.
///
/// ```
/// use statekeeper::compose;
///
/// let describe = compose!(|n: usize| format!("{} chars", n), |s: &str| s.len());
/// assert_eq!(describe("hello"), "5 chars");
///
/// let sum = compose!(|n: i32| n * 10, |(a, b): (i32, i32)| a + b);
/// assert_eq!(sum((1, 2)), 30);
/// ```
#[macro_export]
macro_rules! compose {
    () => {
        |arg| arg
    };
    ($f:expr $(,)?) => {
        $f
    };
    ($f:expr, $($rest:expr),+ $(,)?) => {{
        let outer = $f;
        let inner = $crate::compose!($($rest),+);
        move |arg| outer(inner(arg))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed<'a>(f: impl Fn(i32) -> i32 + 'a) -> Composable<'a, i32> {
        Box::new(f)
    }

    #[test]
    fn test_compose_nothing_is_identity() {
        let identity: Composable<i32> = compose(Vec::new());
        assert_eq!(identity(7), 7);
    }

    #[test]
    fn test_compose_single_function() {
        let composed = compose(vec![boxed(|x| x * 2)]);
        assert_eq!(composed(4), 8);
    }

    #[test]
    fn test_compose_applies_right_to_left() {
        let composed = compose(vec![boxed(|x| x + 1), boxed(|x| x * 2), boxed(|x| x - 3)]);
        // (5 - 3) * 2 + 1
        assert_eq!(composed(5), 5);
    }

    #[test]
    fn test_compose_macro_mixed_types() {
        let shout = compose!(|s: String| s.to_uppercase(), |n: u8| format!("level {}", n));
        assert_eq!(shout(3), "LEVEL 3");
    }

    #[test]
    fn test_compose_macro_variadic_innermost() {
        let area = compose!(|x: u32| x + 1, |x: u32| x * 2, |(w, h): (u32, u32)| w * h);
        assert_eq!(area((3, 4)), 25);
    }

    #[test]
    fn test_compose_macro_empty_is_identity() {
        let identity = compose!();
        assert_eq!(identity("same"), "same");
    }
}
