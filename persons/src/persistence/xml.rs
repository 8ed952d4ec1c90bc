use std::borrow::Cow;

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};
use thiserror::Error;

use crate::{
    consts::consts::IdAllocator,
    model::{
        date::{format_date, parse_date, DateError},
        person::Person,
    },
};

const ROOT_ELEMENT: &str = "persons";
const PERSON_ELEMENT: &str = "person";
const INDENT_SIZE: usize = 4;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),

    #[error("Expected root element <persons>, found <{0}>")]
    UnexpectedRoot(String),

    #[error("Unexpected element <{0}>")]
    UnexpectedElement(String),

    #[error("Document has no <persons> element")]
    MissingRoot,

    #[error("Document ended before </persons>")]
    Truncated,

    #[error("Invalid postal code '{0}': {1}")]
    InvalidPostalCode(String, std::num::ParseIntError),

    #[error("Invalid birthday: {0}")]
    InvalidBirthday(#[from] DateError),

    #[error("Encoded document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Person sub-elements, in the order they are written
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    FirstName,
    LastName,
    Street,
    PostalCode,
    City,
    Birthday,
}

impl Field {
    fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Street => "street",
            Field::PostalCode => "postalCode",
            Field::City => "city",
            Field::Birthday => "birthday",
        }
    }

    fn from_name(name: &str) -> Option<Field> {
        match name {
            "firstName" => Some(Field::FirstName),
            "lastName" => Some(Field::LastName),
            "street" => Some(Field::Street),
            "postalCode" => Some(Field::PostalCode),
            "city" => Some(Field::City),
            "birthday" => Some(Field::Birthday),
            _ => None,
        }
    }

    /// `None` means the element is omitted
    fn value(&self, person: &Person) -> Option<String> {
        match self {
            Field::FirstName => person.first_name().map(str::to_string),
            Field::LastName => person.last_name().map(str::to_string),
            Field::Street => Some(person.street().to_string()),
            Field::PostalCode => Some(person.postal_code().to_string()),
            Field::City => Some(person.city().to_string()),
            Field::Birthday => person.birthday().map(format_date),
        }
    }

    fn apply(&self, person: &mut Person, value: &str) -> Result<(), XmlError> {
        match self {
            Field::FirstName => person.set_first_name(Some(value.to_string())),
            Field::LastName => person.set_last_name(Some(value.to_string())),
            Field::Street => person.set_street(value.to_string()),
            Field::PostalCode => {
                let postal_code = value
                    .trim()
                    .parse::<i32>()
                    .map_err(|e| XmlError::InvalidPostalCode(value.to_string(), e))?;

                person.set_postal_code(postal_code);
            }
            Field::City => person.set_city(value.to_string()),
            Field::Birthday => {
                if value.trim().is_empty() {
                    person.set_birthday(None);
                } else {
                    person.set_birthday(Some(parse_date(value)?));
                }
            }
        }

        Ok(())
    }
}

const FIELDS: [Field; 6] = [
    Field::FirstName,
    Field::LastName,
    Field::Street,
    Field::PostalCode,
    Field::City,
    Field::Birthday,
];

/// Single-root envelope around the person list, only alive for one save or load.
///
/// Saving borrows the caller's list, loading owns what it decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonListWrapper<'a> {
    persons: Cow<'a, [Person]>,
}

impl<'a> PersonListWrapper<'a> {
    pub fn new(persons: &'a [Person]) -> Self {
        Self {
            persons: Cow::Borrowed(persons),
        }
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn set_persons(&mut self, persons: &'a [Person]) {
        self.persons = Cow::Borrowed(persons);
    }

    pub fn into_persons(self) -> Vec<Person> {
        self.persons.into_owned()
    }

    pub fn to_xml(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;

        for person in self.persons.iter() {
            writer.write_event(Event::Start(BytesStart::new(PERSON_ELEMENT)))?;

            for field in FIELDS {
                if let Some(value) = field.value(person) {
                    writer.write_event(Event::Start(BytesStart::new(field.as_str())))?;
                    writer.write_event(Event::Text(BytesText::new(&value)))?;
                    writer.write_event(Event::End(BytesEnd::new(field.as_str())))?;
                }
            }

            writer.write_event(Event::End(BytesEnd::new(PERSON_ELEMENT)))?;
        }

        writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

        let mut document = String::from_utf8(writer.into_inner())?;
        document.push('\n');

        Ok(document)
    }
}

impl PersonListWrapper<'static> {
    pub fn from_persons(persons: Vec<Person>) -> Self {
        Self {
            persons: Cow::Owned(persons),
        }
    }

    /// Decodes a document, every person gets a fresh id from `ids`.
    ///
    /// Fields missing from a person keep the placeholder values of `Person::new`,
    /// unknown elements are skipped.
    pub fn from_xml(document: &str, ids: &mut IdAllocator) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(document);

        let mut persons = Vec::new();
        let mut seen_root = false;
        let mut in_root = false;
        let mut finished = false;
        let mut current: Option<Person> = None;
        let mut field: Option<(Field, String)> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

                    if finished || field.is_some() {
                        return Err(XmlError::UnexpectedElement(name));
                    }

                    if !in_root {
                        if name != ROOT_ELEMENT {
                            return Err(XmlError::UnexpectedRoot(name));
                        }
                        seen_root = true;
                        in_root = true;
                    } else if let Some(person) = current.as_ref() {
                        match Field::from_name(&name) {
                            Some(kind) => field = Some((kind, String::new())),
                            None => {
                                log::debug!("Skipping unknown element <{}> in {}", name, person);
                                reader.read_to_end(e.to_end().name())?;
                            }
                        }
                    } else if name == PERSON_ELEMENT {
                        current = Some(Person::new(ids.allocate(), None, None));
                    } else {
                        log::debug!("Skipping unknown element <{}>", name);
                        reader.read_to_end(e.to_end().name())?;
                    }
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

                    if finished || field.is_some() {
                        return Err(XmlError::UnexpectedElement(name));
                    }

                    if !in_root {
                        if name != ROOT_ELEMENT {
                            return Err(XmlError::UnexpectedRoot(name));
                        }
                        seen_root = true;
                        finished = true;
                    } else if let Some(person) = current.as_mut() {
                        match Field::from_name(&name) {
                            Some(kind) => kind.apply(person, "")?,
                            None => log::debug!("Skipping unknown element <{}>", name),
                        }
                    } else if name == PERSON_ELEMENT {
                        persons.push(Person::new(ids.allocate(), None, None));
                    } else {
                        log::debug!("Skipping unknown element <{}>", name);
                    }
                }
                Event::Text(text) => {
                    if let Some((_, value)) = field.as_mut() {
                        value.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some((_, value)) = field.as_mut() {
                        value.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::End(_) => {
                    if let Some((kind, value)) = field.take() {
                        if let Some(person) = current.as_mut() {
                            kind.apply(person, &value)?;
                        }
                    } else if let Some(person) = current.take() {
                        persons.push(person);
                    } else if in_root {
                        in_root = false;
                        finished = true;
                    }
                }
                Event::Eof => break,
                // Declaration, comments, processing instructions, doctype
                _ => {}
            }
        }

        if !seen_root {
            return Err(XmlError::MissingRoot);
        }

        if !finished {
            return Err(XmlError::Truncated);
        }

        Ok(PersonListWrapper::from_persons(persons))
    }
}
