use crate::{
    endpoint::EndPointError, identity::ClassName, metadata::RelationEndPointId,
    object::ObjectHandle,
};

///
/// ObjectEndPoint
///
/// The object-valued (1:1) virtual side of a relation. Starts incomplete;
/// `mark_data_complete` supplies the related object, `None` meaning "loaded,
/// and there is none". Reads before completion fail loudly.
///

pub struct ObjectEndPoint {
    id: RelationEndPointId,
    expected_class: ClassName,
    state: State,
}

enum State {
    Incomplete,
    Complete(Option<ObjectHandle>),
}

impl ObjectEndPoint {
    #[must_use]
    pub const fn new(id: RelationEndPointId, expected_class: ClassName) -> Self {
        Self {
            id,
            expected_class,
            state: State::Incomplete,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &RelationEndPointId {
        &self.id
    }

    #[must_use]
    pub const fn expected_class(&self) -> &ClassName {
        &self.expected_class
    }

    #[must_use]
    pub const fn is_data_complete(&self) -> bool {
        matches!(self.state, State::Complete(_))
    }

    /// Transition to complete with the related object, or with `None` when
    /// the load found nothing. Errors if already complete.
    pub fn mark_data_complete(&mut self, value: Option<ObjectHandle>) -> Result<(), EndPointError> {
        if self.is_data_complete() {
            return Err(EndPointError::AlreadyComplete {
                end_point: self.id.to_string(),
            });
        }
        self.check_class(value.as_ref())?;

        self.state = State::Complete(value);

        Ok(())
    }

    /// The related object. Fails until `mark_data_complete` has run.
    pub fn value(&self) -> Result<Option<&ObjectHandle>, EndPointError> {
        match &self.state {
            State::Complete(value) => Ok(value.as_ref()),
            State::Incomplete => Err(EndPointError::DataIncomplete {
                end_point: self.id.to_string(),
            }),
        }
    }

    /// Swap in a new related object, returning the previous one. Only legal
    /// once the end point is complete.
    pub fn replace(
        &mut self,
        value: Option<ObjectHandle>,
    ) -> Result<Option<ObjectHandle>, EndPointError> {
        if !self.is_data_complete() {
            return Err(EndPointError::DataIncomplete {
                end_point: self.id.to_string(),
            });
        }
        self.check_class(value.as_ref())?;

        match std::mem::replace(&mut self.state, State::Complete(value)) {
            State::Complete(previous) => Ok(previous),
            State::Incomplete => Ok(None),
        }
    }

    fn check_class(&self, value: Option<&ObjectHandle>) -> Result<(), EndPointError> {
        let Some(handle) = value else {
            return Ok(());
        };

        if handle.id().class() == &self.expected_class {
            Ok(())
        } else {
            Err(EndPointError::WrongObjectClass {
                end_point: self.id.to_string(),
                expected: self.expected_class.clone(),
                actual: handle.id().class().clone(),
            })
        }
    }
}
