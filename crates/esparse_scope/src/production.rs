//! Grammar parameters of the enclosing production.

use crate::flags::ParamFlags;

/// A stack of [`ParamFlags`], pushed at each function boundary.
#[derive(Debug, Clone, Default)]
pub struct ProductionParamHandler {
    stack: Vec<ParamFlags>,
}

impl ProductionParamHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, flags: ParamFlags) {
        self.stack.push(flags);
    }

    pub fn exit(&mut self) {
        self.stack.pop();
    }

    #[inline]
    pub fn current_flags(&self) -> ParamFlags {
        self.stack.last().copied().unwrap_or(ParamFlags::NONE)
    }

    #[inline]
    pub fn has_await(&self) -> bool {
        self.current_flags().contains(ParamFlags::AWAIT)
    }

    #[inline]
    pub fn has_yield(&self) -> bool {
        self.current_flags().contains(ParamFlags::YIELD)
    }

    #[inline]
    pub fn has_return(&self) -> bool {
        self.current_flags().contains(ParamFlags::RETURN)
    }

    #[inline]
    pub fn has_in(&self) -> bool {
        self.current_flags().contains(ParamFlags::IN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_follow_the_stack() {
        let mut params = ProductionParamHandler::new();
        assert_eq!(params.current_flags(), ParamFlags::NONE);
        params.enter(ParamFlags::AWAIT | ParamFlags::RETURN);
        params.enter(ParamFlags::YIELD);
        assert!(params.has_yield());
        assert!(!params.has_await());
        params.exit();
        assert!(params.has_await() && params.has_return());
    }
}
